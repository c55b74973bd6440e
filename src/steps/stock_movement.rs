//! Stock card and movement steps

use std::str::FromStr;

use crate::common::{Error, Result};
use crate::ui::{Direction, Element, Selector};

use super::generic::press_button;
use super::{StepArgs, StepContext, StepFuture, StepRegistry};

const MOVEMENT_ACTIVITY: &str = "StockMovementActivity";

pub fn register(r: &mut StepRegistry) -> Result<()> {
    r.register(r#"^I select stock card called "(.*?)"$"#, select_stock_card_step)?;
    r.register(r#"^I select a reason "(.*?)" "(.*?)"$"#, select_reason_step)?;
    r.register(
        r#"^I enter (received|issued|negative adjustment|positive adjustment) number "(.*?)"$"#,
        enter_movement_step,
    )?;
    r.register(
        r#"^I make a movement "(.*?)" "(.*?)" "(.*?)" "(.*?)" "(.*?)"$"#,
        make_movement_step,
    )?;
    Ok(())
}

/// Column of the movement row a quantity goes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementColumn {
    Received,
    Issued,
    NegativeAdjustment,
    PositiveAdjustment,
}

impl MovementColumn {
    pub fn field_id(&self) -> &'static str {
        match self {
            MovementColumn::Received => "et_received",
            MovementColumn::Issued => "et_issued",
            MovementColumn::NegativeAdjustment => "et_negative_adjustment",
            MovementColumn::PositiveAdjustment => "et_positive_adjustment",
        }
    }

    /// Issued and positive adjustment sit off screen to the left
    pub fn needs_swipe(&self) -> bool {
        matches!(
            self,
            MovementColumn::Issued | MovementColumn::PositiveAdjustment
        )
    }
}

impl FromStr for MovementColumn {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s {
            "received" => Ok(MovementColumn::Received),
            "issued" => Ok(MovementColumn::Issued),
            "negative adjustment" => Ok(MovementColumn::NegativeAdjustment),
            "positive adjustment" => Ok(MovementColumn::PositiveAdjustment),
            other => Err(format!("unknown movement column '{}'", other)),
        }
    }
}

/// Last view matching the selector; new rows are appended at the bottom
async fn last_match(ctx: &StepContext, selector: &Selector) -> Result<Element> {
    ctx.driver()
        .query(selector)
        .await?
        .pop()
        .ok_or_else(|| Error::ElementNotFound(selector.to_string()))
}

pub async fn select_stock_card(ctx: &StepContext, name: &str) -> Result<()> {
    let card = Selector::new("android.widget.TextView")
        .id("product_name")
        .text(name);
    let element = last_match(ctx, &card).await?;
    ctx.driver().touch(&element).await
}

/// Open the reason picker on the newest row and pick a reason and sub-reason
pub async fn select_reason(ctx: &StepContext, reason: &str, detail: &str) -> Result<()> {
    let picker = Selector::new("android.widget.TextView").id("tx_reason");
    let element = last_match(ctx, &picker).await?;
    ctx.driver().touch(&element).await?;
    press_button(ctx, reason).await?;
    press_button(ctx, detail).await
}

pub async fn enter_movement(ctx: &StepContext, column: MovementColumn, number: &str) -> Result<()> {
    let field = Selector::new("android.widget.EditText").id(column.field_id());
    let element = last_match(ctx, &field).await?;
    let driver = ctx.driver();
    driver.touch(&element).await?;
    driver.keyboard_enter_text(number).await?;
    driver.hide_soft_keyboard().await
}

/// Record one movement on a stock card and return to the overview
pub async fn make_movement(
    ctx: &StepContext,
    card: &str,
    reason: &str,
    detail: &str,
    column: MovementColumn,
    number: &str,
) -> Result<()> {
    select_stock_card(ctx, card).await?;
    ctx.wait_for_activity(MOVEMENT_ACTIVITY).await?;
    ctx.settle().await;
    select_reason(ctx, reason, detail).await?;

    if column.needs_swipe() {
        ctx.driver().swipe(Direction::Right).await?;
    }

    ctx.settle().await;
    enter_movement(ctx, column, number).await?;
    press_button(ctx, "Complete").await?;
    ctx.driver().go_back().await
}

fn select_stock_card_step(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { select_stock_card(ctx, args.str(0)?).await })
}

fn select_reason_step(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { select_reason(ctx, args.str(0)?, args.str(1)?).await })
}

fn enter_movement_step(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { enter_movement(ctx, args.parse(0)?, args.str(1)?).await })
}

fn make_movement_step(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        make_movement(
            ctx,
            args.str(0)?,
            args.str(1)?,
            args.str(2)?,
            args.parse(3)?,
            args.str(4)?,
        )
        .await
    })
}
