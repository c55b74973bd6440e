//! Steps that change product data on the server

use crate::common::Result;
use crate::fixtures::FixtureScript;

use super::{StepArgs, StepContext, StepFuture, StepRegistry};

pub fn register(r: &mut StepRegistry) -> Result<()> {
    r.register(r"^Server updates drug data$", update_products)?;
    r.register(
        r"^I clean up server drug data which I updated$",
        rollback_updated_products,
    )?;
    r.register(
        r"^server deactivates products 12D03 and 07L01$",
        deactivate_products,
    )?;
    r.register(r"^server reactive products$", reactivate_products)?;
    r.register(
        r"^server deactivates products has stock movement$",
        deactivate_products_with_movement,
    )?;
    Ok(())
}

fn update_products(ctx: &StepContext, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(ctx.fixture(FixtureScript::UpdateProducts))
}

fn rollback_updated_products(ctx: &StepContext, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(ctx.fixture(FixtureScript::RollbackUpdatedProducts))
}

fn deactivate_products(ctx: &StepContext, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(ctx.fixture(FixtureScript::DeactivateProducts))
}

fn reactivate_products(ctx: &StepContext, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(ctx.fixture(FixtureScript::ReactivateProducts))
}

fn deactivate_products_with_movement(ctx: &StepContext, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(ctx.fixture(FixtureScript::DeactivateProductsWithStockMovement))
}
