use crate::context::AppContext;
use crate::error::CodeseekerError;

use std::fmt::Write;

/// Send a probe to each configured model.
pub async fn run(ctx: &AppContext) -> Result<String, CodeseekerError> {
    let Some(config) = ctx.service.config().await else {
        return Err(CodeseekerError::app(
            "No model configuration. Run `codeseeker config set` first",
        ));
    };

    let primary_ok = ctx.service.test_primary_model().await;
    let mut out = String::new();
    let _ = writeln!(out, "primary   {}: {}", config.primary_model_id, status(primary_ok));

    let secondary_ok = if config.use_same_model_for_both {
        let _ = writeln!(out, "secondary: same as primary");
        primary_ok
    } else {
        let ok = ctx.service.test_secondary_model().await;
        let _ = writeln!(out, "secondary {}: {}", config.secondary_model_id, status(ok));
        ok
    };

    if primary_ok && secondary_ok {
        Ok(out)
    } else {
        Err(CodeseekerError::app(format!(
            "Model connection test failed\n{out}"
        )))
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "ok" } else { "FAILED" }
}
