//! Login screen steps

use tracing::info;

use crate::common::{Error, Result};
use crate::ui::Selector;

use super::{StepArgs, StepContext, StepFuture, StepRegistry};

pub fn register(r: &mut StepRegistry) -> Result<()> {
    r.register(r#"^I try to log in with "(.*?)" "(.*?)"$"#, log_in_with)?;
    r.register(r"^I log in with the configured account$", log_in_configured)?;
    Ok(())
}

/// Fill the login form and submit it
pub async fn log_in(ctx: &StepContext, username: &str, password: &str) -> Result<()> {
    let driver = ctx.driver();
    info!(username, "logging in");

    driver
        .enter_text(&Selector::new("android.widget.EditText").id("tx_username"), username)
        .await?;
    driver
        .enter_text(&Selector::new("android.widget.EditText").id("tx_password"), password)
        .await?;
    driver.hide_soft_keyboard().await?;

    let button = Selector::any().id("btn_login");
    let login = driver
        .query(&button)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::ElementNotFound(button.to_string()))?;
    driver.touch(&login).await
}

fn log_in_with(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { log_in(ctx, args.str(0)?, args.str(1)?).await })
}

fn log_in_configured(ctx: &StepContext, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let credentials = &ctx.options.credentials;
        log_in(ctx, &credentials.username, &credentials.password).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::test_support::mock_context_with;
    use crate::ui::{Action, Element};

    #[tokio::test]
    async fn test_configured_account_on_uat() {
        let (ctx, mock) = mock_context_with(|c| c.environment.0 = "uat".to_string());
        mock.set_elements(
            "android.widget.EditText id:'tx_username'",
            vec![Element::with_text("android.widget.EditText", "tx_username", "")],
        );
        mock.set_elements(
            "android.widget.EditText id:'tx_password'",
            vec![Element::with_text("android.widget.EditText", "tx_password", "")],
        );
        let button = Element::with_text("android.widget.Button", "btn_login", "LOG IN");
        mock.set_elements("* id:'btn_login'", vec![button.clone()]);

        log_in_configured(&ctx, StepArgs::default()).await.unwrap();

        assert_eq!(mock.entered_text(), ["test_user", "testuser"]);
        assert_eq!(mock.actions().last(), Some(&Action::Touch(button)));
    }

    #[tokio::test]
    async fn test_missing_username_field_fails() {
        let (ctx, _mock) = mock_context_with(|_| {});
        let err = log_in(&ctx, "superuser", "password1").await.unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(s) if s.contains("tx_username")));
    }
}
