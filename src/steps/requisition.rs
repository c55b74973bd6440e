//! Requisition form steps

use serde_json::Value;
use tracing::warn;

use crate::common::{Error, Result};
use crate::ui::Selector;

use super::{StepArgs, StepContext, StepFuture, StepRegistry};

pub fn register(r: &mut StepRegistry) -> Result<()> {
    r.register(r#"^I should see "(\d+)" products$"#, should_see_products)?;
    r.register(r#"^I enter consultationsNub "(\d+)"$"#, enter_consultations)?;
    r.register(r#"^I enter QuantityRequested "(\d+)"$"#, enter_quantity_requested)?;
    r.register(
        r#"^I should see "(\d+)" on index "(\d+)" of "(.*?)" field$"#,
        should_see_on_index,
    )?;
    r.register(r#"^I should see "(\d+)" in the requisition form$"#, should_see_in_form)?;
    Ok(())
}

/// Number a text property holds, tolerating surrounding whitespace
fn as_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The product list has one header row on top of the products
fn should_see_products(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let expected = args
            .parse::<usize>(0)?
            .checked_add(1)
            .ok_or_else(|| Error::StepArgument {
                index: 1,
                reason: "product count out of range".to_string(),
            })?;
        let list = Selector::new("ListView");
        let sizes = ctx
            .driver()
            .query_property(&list, &["getAdapter", "getCount"])
            .await?;

        let size = sizes
            .first()
            .ok_or_else(|| Error::ElementNotFound(list.to_string()))?;
        let actual = as_number(size)
            .ok_or_else(|| Error::Assertion(format!("list size {} is not a number", size)))?;

        match usize::try_from(actual) {
            Ok(actual) if actual == expected => Ok(()),
            Ok(actual) => Err(Error::element_count(
                format!("{} adapter rows", list),
                expected,
                actual,
            )),
            Err(_) => Err(Error::Assertion(format!(
                "list size {} is negative",
                actual
            ))),
        }
    })
}

fn enter_consultations(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let driver = ctx.driver();
        driver
            .enter_text(
                &Selector::new("android.widget.EditText").id("edit_text"),
                args.str(0)?,
            )
            .await?;
        driver.hide_soft_keyboard().await
    })
}

/// Types the amount into every request field on screen
fn enter_quantity_requested(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let amount = args.str(0)?;
        let driver = ctx.driver();
        let selector = Selector::new("android.widget.EditText").id("et_request_amount");
        let fields = driver.query(&selector).await?;
        if fields.is_empty() {
            return Err(Error::ElementNotFound(selector.to_string()));
        }

        for field in &fields {
            driver.touch(field).await?;
            driver.keyboard_enter_text(amount).await?;
            driver.hide_soft_keyboard().await?;
        }
        Ok(())
    })
}

fn should_see_on_index(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let expected = args.int(0)?;
        let index: usize = args.parse(1)?;
        let field = args.str(2)?;

        if ctx.options.skip_validation {
            warn!(field, index, expected, "skipping field value check");
            return Ok(());
        }
        if index == 0 {
            return Err(Error::StepArgument {
                index: 2,
                reason: "field indexes start at 1".to_string(),
            });
        }

        let selector = Selector::new("android.widget.TextView").id(field);
        let texts = ctx.driver().query_property(&selector, &["text"]).await?;
        let value = texts
            .get(index - 1)
            .ok_or_else(|| Error::element_count(&selector, index, texts.len()))?;

        match as_number(value) {
            Some(actual) if actual == expected => Ok(()),
            _ => Err(Error::Assertion(format!(
                "expected {} at index {} of '{}', found {}",
                expected, index, field, value
            ))),
        }
    })
}

fn should_see_in_form(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let number = args.str(0)?;
        if ctx.options.skip_validation {
            warn!(number, "skipping requisition form check");
            return Ok(());
        }
        ctx.wait_for_text(number).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::test_support::{mock_context, mock_context_with};
    use crate::ui::{Action, Element};
    use serde_json::json;

    fn args(values: &[&str]) -> StepArgs {
        StepArgs::new(values.iter().map(|v| v.to_string()).collect())
    }

    #[tokio::test]
    async fn test_product_count_includes_header_row() {
        let (ctx, mock) = mock_context();
        mock.set_property("ListView", vec![json!(11)]);
        should_see_products(&ctx, args(&["10"])).await.unwrap();

        mock.set_property("ListView", vec![json!(10)]);
        let err = should_see_products(&ctx, args(&["10"])).await.unwrap_err();
        assert!(matches!(err, Error::ElementCount { expected: 11, actual: 10, .. }));
    }

    #[tokio::test]
    async fn test_product_count_at_usize_max_is_rejected() {
        let (ctx, mock) = mock_context();
        mock.set_property("ListView", vec![json!(11)]);
        let registry = crate::steps::StepRegistry::standard().unwrap();

        let err = registry
            .dispatch(&ctx, r#"Then I should see "18446744073709551615" products"#)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StepArgument { index: 1, .. }));
    }

    #[tokio::test]
    async fn test_negative_list_size_fails() {
        let (ctx, mock) = mock_context();
        mock.set_property("ListView", vec![json!(-1)]);
        let err = should_see_products(&ctx, args(&["10"])).await.unwrap_err();
        assert!(matches!(err, Error::Assertion(_)));
    }

    #[tokio::test]
    async fn test_missing_list_fails() {
        let (ctx, _mock) = mock_context();
        let err = should_see_products(&ctx, args(&["10"])).await.unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(_)));
    }

    #[tokio::test]
    async fn test_quantity_requested_fills_every_field() {
        let (ctx, mock) = mock_context();
        let fields = vec![
            Element::with_text("android.widget.EditText", "et_request_amount", ""),
            Element::with_text("android.widget.EditText", "et_request_amount", ""),
        ];
        mock.set_elements("android.widget.EditText id:'et_request_amount'", fields.clone());

        enter_quantity_requested(&ctx, args(&["345"])).await.unwrap();

        assert_eq!(mock.entered_text(), ["345", "345"]);
        let hides = mock
            .actions()
            .iter()
            .filter(|a| **a == Action::HideKeyboard)
            .count();
        assert_eq!(hides, 2);
    }

    #[tokio::test]
    async fn test_quantity_requested_without_fields_fails() {
        let (ctx, _mock) = mock_context();
        assert!(enter_quantity_requested(&ctx, args(&["345"])).await.is_err());
    }

    #[tokio::test]
    async fn test_index_is_one_based() {
        let (ctx, mock) = mock_context();
        mock.set_property(
            "android.widget.TextView id:'tx_total'",
            vec![json!("100"), json!(" 300 ")],
        );

        should_see_on_index(&ctx, args(&["300", "2", "tx_total"]))
            .await
            .unwrap();
        let err = should_see_on_index(&ctx, args(&["300", "1", "tx_total"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Assertion(_)));
        let err = should_see_on_index(&ctx, args(&["300", "3", "tx_total"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ElementCount { expected: 3, actual: 2, .. }));
    }

    #[tokio::test]
    async fn test_skip_validation_suppresses_checks() {
        let (ctx, _mock) = mock_context_with(|c| c.scenario.skip_validation = true);
        should_see_on_index(&ctx, args(&["300", "1", "tx_total"]))
            .await
            .unwrap();
        should_see_in_form(&ctx, args(&["888"])).await.unwrap();
    }

    #[tokio::test]
    async fn test_form_value_must_appear() {
        let (ctx, mock) = mock_context();
        assert!(matches!(
            should_see_in_form(&ctx, args(&["888"])).await,
            Err(Error::WaitTimeout { .. })
        ));
        mock.show_text("888");
        should_see_in_form(&ctx, args(&["888"])).await.unwrap();
    }
}
