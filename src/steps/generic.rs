//! Device, navigation and wait steps shared by every feature

use std::time::Duration;

use tracing::debug;

use crate::common::{Error, Result};
use crate::device::DeviceAction;
use crate::ui::{wait, Direction, Orientation, Selector};

use super::{StepArgs, StepContext, StepFuture, StepRegistry};

pub fn register(r: &mut StepRegistry) -> Result<()> {
    r.register(r#"^I rotate the page to "(.*?)"$"#, rotate)?;
    r.register(r#"^I change device date to "(.*?)"$"#, change_date)?;
    r.register(r"^I disable wifi$", disable_wifi)?;
    r.register(r"^I enable wifi$", enable_wifi)?;
    r.register(r#"^I press "(.*?)"$"#, press)?;
    r.register(r#"^I wait for the "(.*?)" screen to appear$"#, wait_for_screen)?;
    r.register(r"^I wait for (\d+) seconds?$", wait_seconds)?;
    r.register(r#"^I wait for "(.*?)" to appear$"#, wait_for_text)?;
    r.register(r"^I swipe (left|right|up|down)$", swipe)?;
    r.register(r"^I go back$", go_back)?;
    r.register(r#"^I should see text "(.*?)"$"#, should_see_text)?;
    Ok(())
}

/// Touch the first view marked `label`, waiting for it to show up
pub async fn press_button(ctx: &StepContext, label: &str) -> Result<()> {
    let selector = Selector::any().marked(label);
    let driver = ctx.driver();
    let what = format!("'{}' to be pressable", label);
    let query = &selector;
    let found = wait::wait_until(
        &what,
        ctx.options.wait_timeout,
        ctx.options.poll_interval,
        move || async move { Ok::<_, Error>(!driver.query(query).await?.is_empty()) },
    )
    .await;

    if let Err(Error::WaitTimeout { .. }) = found {
        return Err(Error::ElementNotFound(selector.to_string()));
    }
    found?;

    let element = driver
        .query(&selector)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::ElementNotFound(selector.to_string()))?;
    debug!(label, "pressing");
    driver.touch(&element).await
}

fn rotate(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let orientation: Orientation = args.parse(0)?;
        ctx.driver().set_orientation(orientation).await
    })
}

fn change_date(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let time = args.str(0)?.to_string();
        ctx.device(DeviceAction::SetDate(time)).await
    })
}

fn disable_wifi(ctx: &StepContext, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(ctx.device(DeviceAction::SetWifi(false)))
}

fn enable_wifi(ctx: &StepContext, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(ctx.device(DeviceAction::SetWifi(true)))
}

fn press(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { press_button(ctx, args.str(0)?).await })
}

fn wait_for_screen(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { ctx.wait_for_activity(args.str(0)?).await })
}

fn wait_seconds(_ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let secs: u64 = args.parse(0)?;
        tokio::time::sleep(Duration::from_secs(secs)).await;
        Ok(())
    })
}

fn wait_for_text(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { ctx.wait_for_text(args.str(0)?).await })
}

fn swipe(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let direction: Direction = args.parse(0)?;
        ctx.driver().swipe(direction).await
    })
}

fn go_back(ctx: &StepContext, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(ctx.driver().go_back())
}

fn should_see_text(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let text = args.str(0)?;
        if ctx.driver().text_visible(text).await? {
            Ok(())
        } else {
            Err(Error::Assertion(format!("text '{}' is not on screen", text)))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::test_support::mock_context;
    use crate::ui::{Action, Element};

    fn args(values: &[&str]) -> StepArgs {
        StepArgs::new(values.iter().map(|v| v.to_string()).collect())
    }

    #[tokio::test]
    async fn test_press_touches_marked_view() {
        let (ctx, mock) = mock_context();
        let button = Element::with_text("android.widget.Button", "btn_complete", "Complete");
        mock.set_elements("* marked:'Complete'", vec![button.clone()]);

        press(&ctx, args(&["Complete"])).await.unwrap();
        assert_eq!(mock.actions(), vec![Action::Touch(button)]);
    }

    #[tokio::test]
    async fn test_press_missing_view_fails() {
        let (ctx, mock) = mock_context();
        let err = press(&ctx, args(&["Complete"])).await.unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(s) if s.contains("Complete")));
        assert!(mock.actions().is_empty());
    }

    #[tokio::test]
    async fn test_rotate_and_swipe() {
        let (ctx, mock) = mock_context();
        rotate(&ctx, args(&["landscape"])).await.unwrap();
        swipe(&ctx, args(&["right"])).await.unwrap();
        go_back(&ctx, args(&[])).await.unwrap();
        assert_eq!(
            mock.actions(),
            vec![
                Action::Orientation(Orientation::Landscape),
                Action::Swipe(Direction::Right),
                Action::GoBack,
            ]
        );
    }

    #[tokio::test]
    async fn test_rotate_rejects_unknown_orientation() {
        let (ctx, _mock) = mock_context();
        let err = rotate(&ctx, args(&["sideways"])).await.unwrap_err();
        assert!(matches!(err, Error::StepArgument { index: 1, .. }));
    }

    #[tokio::test]
    async fn test_wait_for_text_times_out() {
        let (ctx, _mock) = mock_context();
        let err = wait_for_text(&ctx, args(&["Stock Overview"])).await.unwrap_err();
        assert!(matches!(err, Error::WaitTimeout { .. }));
    }

    #[tokio::test]
    async fn test_should_see_text() {
        let (ctx, mock) = mock_context();
        mock.show_text("Total:1");
        should_see_text(&ctx, args(&["total:1"])).await.unwrap();
        assert!(should_see_text(&ctx, args(&["Total:2"])).await.is_err());
    }

    #[tokio::test]
    async fn test_wait_for_screen_accepts_qualified_name() {
        let (ctx, mock) = mock_context();
        mock.set_activity("org.openlmis.core.view.activity.StockMovementActivity");
        wait_for_screen(&ctx, args(&["StockMovementActivity"])).await.unwrap();
    }
}
