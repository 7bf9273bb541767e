use crate::context::AppContext;
use crate::render::render_models;

pub fn run(ctx: &AppContext) -> String {
    render_models(&ctx.service.supported_models())
}
