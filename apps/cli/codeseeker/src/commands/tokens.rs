use crate::context::AppContext;
use crate::error::CodeseekerError;
use crate::render::{render_json, render_token_count};

use std::path::Path;

use log::{debug, warn};

/// Count project tokens, adding `extensions` to the recognized set first.
pub async fn run(
    ctx: &AppContext,
    root: &Path,
    extensions: &[String],
    json: bool,
) -> Result<String, CodeseekerError> {
    for ext in extensions {
        if ctx.service.add_custom_code_extension(ext).await {
            debug!("Counting extra extension {ext}");
        } else {
            warn!("Extension {ext} ignored (empty or already counted)");
        }
    }

    let count = ctx.service.analyze_project_tokens(root.to_path_buf()).await?;

    if json {
        return render_json(&count);
    }

    let cost = match ctx.service.config().await {
        Some(config) => ctx
            .service
            .primary_model_pricing()
            .await
            .ok()
            .map(|pricing| (config.primary_model_id, pricing)),
        None => None,
    };

    Ok(render_token_count(
        &count,
        cost.as_ref().map(|(id, pricing)| (id.as_str(), *pricing)),
    ))
}
