//! Product catalogue and inventory steps
//!
//! The stress switch picks between the bulk path, which initializes 300
//! products, and the single item path built around product `08S01ZY`.

use tracing::debug;

use crate::common::{Error, Result};
use crate::ui::{Direction, Element, Selector};

use super::{StepArgs, StepContext, StepFuture, StepRegistry};

const SINGLE_PRODUCT: &str = "08S01ZY";
const SINGLE_QUANTITY: &str = "2008";
const BULK_PRODUCTS: usize = 300;

pub fn register(r: &mut StepRegistry) -> Result<()> {
    r.register(r"^I have added new drugs$", have_added_new_drugs)?;
    r.register(r"^I check new drug quantity$", check_new_drug_quantity)?;
    r.register(
        r#"^I select new drug "(.*?)" with SOH "(.*?)" quantity$"#,
        select_new_drug_step,
    )?;
    r.register(
        r#"^I search product by fnm "(.*?)" and select this item with quantity "(\d+)"$"#,
        search_and_select_step,
    )?;
    r.register(r#"^I search drug by fnm "(.*?)"$"#, search_drug_step)?;
    r.register(r#"^I select the item called "(.*?)"$"#, select_item_step)?;
    r.register(
        r#"^I enter quantity "(\d+)" on inventory page$"#,
        enter_quantity_step,
    )?;
    r.register(r#"^I initialize "(\d+)" products$"#, initialize_products_step)?;
    r.register(r#"^I should see total:"(\d+)" on stock list page$"#, should_see_total_step)?;
    Ok(())
}

fn unchecked_box() -> Selector {
    Selector::new("android.widget.CheckBox")
        .id("checkbox")
        .checked(false)
}

fn quantity_field() -> Selector {
    Selector::new("android.widget.EditText").id("tx_quantity")
}

async fn first_unchecked(ctx: &StepContext) -> Result<Option<Element>> {
    Ok(ctx.driver().query(&unchecked_box()).await?.into_iter().next())
}

/// Type a product code into the search box
pub async fn search_drug(ctx: &StepContext, code: &str) -> Result<()> {
    let driver = ctx.driver();
    if let Some(icon) = driver
        .query(&Selector::any().id("action_search"))
        .await?
        .into_iter()
        .next()
    {
        driver.touch(&icon).await?;
    }
    driver
        .enter_text(
            &Selector::new("android.widget.EditText").id("search_src_text"),
            code,
        )
        .await?;
    driver.hide_soft_keyboard().await
}

/// Tick the checkbox of the item shown for `name`
pub async fn select_item_called(ctx: &StepContext, name: &str) -> Result<()> {
    if !ctx.driver().text_visible(name).await? {
        return Err(Error::ElementNotFound(format!("item '{}'", name)));
    }
    let checkbox = first_unchecked(ctx)
        .await?
        .ok_or_else(|| Error::ElementNotFound(unchecked_box().to_string()))?;
    ctx.driver().touch(&checkbox).await
}

pub async fn enter_inventory_quantity(ctx: &StepContext, quantity: &str) -> Result<()> {
    let driver = ctx.driver();
    driver.enter_text(&quantity_field(), quantity).await?;
    driver.hide_soft_keyboard().await
}

pub async fn search_and_select(ctx: &StepContext, code: &str, quantity: &str) -> Result<()> {
    search_drug(ctx, code).await?;
    select_item_called(ctx, code).await?;
    enter_inventory_quantity(ctx, quantity).await
}

/// Tick `count` products one after another, giving each a quantity of 1
///
/// Scrolls the list up when no unchecked product is left on screen.
pub async fn initialize_products(ctx: &StepContext, count: usize) -> Result<()> {
    let driver = ctx.driver();
    for done in 0..count {
        let checkbox = match first_unchecked(ctx).await? {
            Some(checkbox) => checkbox,
            None => {
                driver.swipe(Direction::Up).await?;
                first_unchecked(ctx)
                    .await?
                    .ok_or_else(|| Error::element_count(unchecked_box(), count, done))?
            }
        };
        driver.touch(&checkbox).await?;

        let field = driver
            .query(&quantity_field())
            .await?
            .pop()
            .ok_or_else(|| Error::ElementNotFound(quantity_field().to_string()))?;
        driver.touch(&field).await?;
        driver.keyboard_enter_text("1").await?;
        driver.hide_soft_keyboard().await?;
        debug!(done = done + 1, count, "initialized product");
    }
    Ok(())
}

pub async fn should_see_total(ctx: &StepContext, total: &str) -> Result<()> {
    ctx.wait_for_text(&format!("Total:{}", total)).await
}

fn have_added_new_drugs(ctx: &StepContext, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        if ctx.options.stress_test {
            initialize_products(ctx, BULK_PRODUCTS).await
        } else {
            search_and_select(ctx, SINGLE_PRODUCT, SINGLE_QUANTITY).await
        }
    })
}

fn check_new_drug_quantity(ctx: &StepContext, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        if ctx.options.stress_test {
            should_see_total(ctx, &BULK_PRODUCTS.to_string()).await
        } else {
            should_see_total(ctx, "1").await?;
            search_and_select(ctx, SINGLE_PRODUCT, SINGLE_QUANTITY).await
        }
    })
}

/// Selects the product only if it is not ticked yet
fn select_new_drug_step(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let code = args.str(0)?;
        let soh = args.str(1)?;
        search_drug(ctx, code).await?;
        if first_unchecked(ctx).await?.is_some() {
            select_item_called(ctx, code).await?;
            enter_inventory_quantity(ctx, soh).await?;
        }
        Ok(())
    })
}

fn search_and_select_step(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { search_and_select(ctx, args.str(0)?, args.str(1)?).await })
}

fn search_drug_step(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { search_drug(ctx, args.str(0)?).await })
}

fn select_item_step(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { select_item_called(ctx, args.str(0)?).await })
}

fn enter_quantity_step(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { enter_inventory_quantity(ctx, args.str(0)?).await })
}

fn initialize_products_step(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { initialize_products(ctx, args.parse(0)?).await })
}

fn should_see_total_step(ctx: &StepContext, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { should_see_total(ctx, args.str(0)?).await })
}
