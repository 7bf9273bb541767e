mod answer_tree;
mod line_range;
mod model_config;
