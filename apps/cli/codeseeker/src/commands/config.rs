use crate::cli::SetConfigArgs;
use crate::context::AppContext;
use crate::error::CodeseekerError;
use crate::render::render_config;

use models::ModelConfig;

use seeker_core::ProviderEndpoints;
use seeker_core::config::ENDPOINTS_KEY;
use seeker_core::registry::model_by_id;

use log::info;

pub async fn show(ctx: &AppContext) -> String {
    render_config(ctx.service.config().await.as_ref())
}

/// Build, validate, persist and activate a model configuration.
pub async fn set(ctx: &AppContext, args: &SetConfigArgs) -> Result<String, CodeseekerError> {
    let config = build_config(args, |name| std::env::var(name).ok())?;
    ctx.service.save_config(config).await?;
    Ok(show(ctx).await)
}

/// Keys come from flags first, then from `lookup` on the provider's
/// environment variable.
pub fn build_config(
    args: &SetConfigArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ModelConfig, CodeseekerError> {
    let mut builder = ModelConfig::builder()
        .with_primary_model(&args.primary)
        .with_same_model_for_both(args.same_model);

    if let Some(key) = resolve_key(args.primary_key.as_deref(), &args.primary, &lookup) {
        builder = builder.with_primary_api_key(key);
    }

    if !args.same_model {
        let secondary = args
            .secondary
            .as_deref()
            .ok_or_else(|| CodeseekerError::invalid_config("Secondary model is required"))?;
        builder = builder.with_secondary_model(secondary);
        if let Some(key) = resolve_key(args.secondary_key.as_deref(), secondary, &lookup) {
            builder = builder.with_secondary_api_key(key);
        }
    }

    builder
        .build()
        .map_err(|e| CodeseekerError::invalid_config(e.to_string()))
}

fn resolve_key(
    explicit: Option<&str>,
    model_id: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
        return Some(key.to_string());
    }
    let provider = model_by_id(model_id)?.provider;
    lookup(provider.api_key_env()).filter(|k| !k.trim().is_empty())
}

/// Merge base URL overrides into the stored ones.
pub fn set_endpoints(
    ctx: &AppContext,
    endpoints: ProviderEndpoints,
) -> Result<String, CodeseekerError> {
    endpoints.validate()?;
    let store = ctx.service.store();
    let merged = store.load_endpoints()?.merge(endpoints);
    store.set(ENDPOINTS_KEY, &merged)?;
    info!("Stored provider endpoints: {merged:?}");

    Ok(format!(
        "anthropic: {}\ndeepseek:  {}\n",
        merged.anthropic.as_deref().unwrap_or("(default)"),
        merged.deepseek.as_deref().unwrap_or("(default)")
    ))
}
