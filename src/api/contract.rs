//! Contract cases against the REST API
//!
//! Each case is independent: one failing case is reported and the suite
//! moves on to the next.

use std::fmt::Debug;

use colored::Colorize;
use tracing::{debug, info};

use crate::common::config::Config;
use crate::common::{Error, Result};

use super::client::LmisClient;
use super::fixtures;
use super::types::{Credentials, RequisitionStatus};

/// The servers and account a contract run talks to
pub struct ContractTargets {
    /// Development server: login and stock card sync
    pub dev: LmisClient,
    /// UAT server: requisitions (no delete endpoint, UAT is wiped regularly)
    pub uat: LmisClient,
    /// Account used for basic auth
    pub account: Credentials,
}

impl ContractTargets {
    /// Both servers from configuration, authenticated as the superuser
    ///
    /// The account does not follow the selected environment: the contract
    /// fixtures are seeded for the superuser on both servers.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.api.request_timeout();
        Ok(Self {
            dev: LmisClient::new(&config.api.dev_url, timeout)?,
            uat: LmisClient::new(&config.api.uat_url, timeout)?,
            account: fixtures::superuser(),
        })
    }
}

/// A single contract case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractCase {
    SuperuserLogin,
    SupportedPrograms,
    RequisitionRoundTrip,
    StockCardSync,
}

impl ContractCase {
    pub const ALL: [ContractCase; 4] = [
        ContractCase::SuperuserLogin,
        ContractCase::SupportedPrograms,
        ContractCase::RequisitionRoundTrip,
        ContractCase::StockCardSync,
    ];

    /// Short name used on the command line
    pub fn id(&self) -> &'static str {
        match self {
            ContractCase::SuperuserLogin => "login",
            ContractCase::SupportedPrograms => "programs",
            ContractCase::RequisitionRoundTrip => "requisition",
            ContractCase::StockCardSync => "stock-cards",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ContractCase::SuperuserLogin => "login returns the exact superuser identity",
            ContractCase::SupportedPrograms => "login lists supported programs",
            ContractCase::RequisitionRoundTrip => "submitted requisition can be fetched back",
            ContractCase::StockCardSync => "stock card events sync for the user's facility",
        }
    }

    pub fn from_id(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|c| c.id()).collect();
                Error::Config(format!(
                    "Unknown contract case '{}'. Known cases: {}",
                    id,
                    known.join(", ")
                ))
            })
    }
}

/// Outcome of one contract case
#[derive(Debug)]
pub struct CaseResult {
    pub case: ContractCase,
    pub passed: bool,
    pub error: Option<String>,
}

/// Run the given cases in order and print a report
pub async fn run_suite(targets: &ContractTargets, cases: &[ContractCase]) -> Vec<CaseResult> {
    println!("\n{}", "Contract cases:".cyan());

    let mut results = Vec::with_capacity(cases.len());
    for case in cases {
        let outcome = run_case(targets, *case).await;
        match &outcome {
            Ok(()) => println!("  {} {}", "✓".green(), case.description()),
            Err(e) => {
                println!("  {} {}", "✗".red(), case.description());
                println!("      {}", e.to_string().red());
            }
        }
        results.push(CaseResult {
            case: *case,
            passed: outcome.is_ok(),
            error: outcome.err().map(|e| e.to_string()),
        });
    }

    let failed = results.iter().filter(|r| !r.passed).count();
    let summary = format!("{} passed, {} failed", results.len() - failed, failed);
    if failed == 0 {
        println!("\n{} {}\n", "✓".green().bold(), summary.green().bold());
    } else {
        println!("\n{} {}\n", "✗".red().bold(), summary.red().bold());
    }

    results
}

/// Run a single contract case
pub async fn run_case(targets: &ContractTargets, case: ContractCase) -> Result<()> {
    info!(case = case.id(), "running contract case");
    match case {
        ContractCase::SuperuserLogin => superuser_login(&targets.dev).await,
        ContractCase::SupportedPrograms => supported_programs(&targets.dev).await,
        ContractCase::RequisitionRoundTrip => {
            requisition_round_trip(&targets.uat, &targets.account).await
        }
        ContractCase::StockCardSync => stock_card_sync(&targets.dev, &targets.account).await,
    }
}

async fn superuser_login(client: &LmisClient) -> Result<()> {
    let response = client.login(&fixtures::superuser()).await?;
    let user = &response.user_information;

    expect_eq("userInformation", &fixtures::superuser_identity(), &user.identity())?;
    expect_present("userInformation.facilityId", user.facility_id.as_ref())?;
    Ok(())
}

async fn supported_programs(client: &LmisClient) -> Result<()> {
    let response = client.login(&fixtures::mystique()).await?;
    let user = &response.user_information;
    let expected = fixtures::mystique_identity();

    expect_eq("userInformation.userName", &expected.user_name, &user.user_name)?;
    expect_eq(
        "userInformation.userFirstName",
        &Some(&expected.first_name),
        &user.user_first_name.as_ref(),
    )?;
    expect_eq(
        "userInformation.userLastName",
        &Some(&expected.last_name),
        &user.user_last_name.as_ref(),
    )?;
    expect_eq(
        "userInformation.facilityCode",
        &Some(&expected.facility_code),
        &user.facility_code.as_ref(),
    )?;
    expect_present("userInformation.facilityId", user.facility_id.as_ref())?;

    expect_eq(
        "facilitySupportedPrograms.length",
        &4,
        &response.facility_supported_programs.len(),
    )?;

    let tb = expect_present("program TB", response.program("TB"))?;
    expect_eq("TB.parentCode", &Some("ESS_MEDS"), &tb.parent_code.as_deref())?;
    expect_eq("TB.programName", "TB", tb.program_name.as_str())?;
    Ok(())
}

async fn requisition_round_trip(client: &LmisClient, auth: &Credentials) -> Result<()> {
    let id = client.submit_requisition(&fixtures::requisition(), auth).await?;
    debug!(requisition_id = id, "requisition created");

    let record = client.fetch_requisition(id, auth).await?;
    expect_eq("requisition.id", &id, &record.id)?;
    expect_eq("requisition.programCode", "ESS_MEDS", record.program_code.as_str())?;
    expect_eq("requisition.agentCode", "F10", record.agent_code.as_str())?;
    expect_eq("requisition.emergency", &false, &record.emergency)?;
    expect_eq(
        "requisition.requisitionStatus",
        &RequisitionStatus::Authorized,
        &record.requisition_status,
    )?;
    Ok(())
}

async fn stock_card_sync(client: &LmisClient, auth: &Credentials) -> Result<()> {
    let login = client.login(auth).await?;
    let facility_id = expect_present(
        "userInformation.facilityId",
        login.user_information.facility_id.as_ref(),
    )?;

    client
        .sync_stock_cards(facility_id, &fixtures::stock_card_events(), auth)
        .await
}

/// Fail with expected vs. actual when the values differ
pub fn expect_eq<T: PartialEq + Debug + ?Sized>(what: &str, expected: &T, actual: &T) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::Contract(format!(
            "{}: expected {:?}, got {:?}",
            what, expected, actual
        )))
    }
}

/// Fail when a value the contract requires is missing
pub fn expect_present<T>(what: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::Contract(format!("{}: expected a value, got null", what)))
}
