//! Literal request payloads used by the contract cases

use chrono::NaiveDateTime;

use super::types::{
    basic_timestamp, Credentials, PatientBucket, ProductLine, Regimen, Requisition,
    StockCardEvent, UserIdentity,
};

/// Account behind the basic auth of the requisition and stock card cases
pub fn superuser() -> Credentials {
    Credentials::new("superuser", "password1")
}

/// Account with four supported programs
pub fn mystique() -> Credentials {
    Credentials::new("mystique", "password1")
}

/// Identity the superuser login must return exactly
pub fn superuser_identity() -> UserIdentity {
    UserIdentity {
        user_name: "superuser".to_string(),
        first_name: "Super".to_string(),
        last_name: "User".to_string(),
        facility_code: "F10".to_string(),
    }
}

/// Identity the mystique login must return
pub fn mystique_identity() -> UserIdentity {
    UserIdentity {
        user_name: "mystique".to_string(),
        first_name: "Raven".to_string(),
        last_name: "Darkholme".to_string(),
        facility_code: "HF2".to_string(),
    }
}

/// Essential medicines requisition for agent F10
pub fn requisition() -> Requisition {
    Requisition {
        program_code: "ESS_MEDS".to_string(),
        agent_code: "F10".to_string(),
        products: vec![ProductLine {
            product_code: "P74".to_string(),
            beginning_balance: 1000,
            quantity_received: 2000,
            quantity_dispensed: 2500,
            total_losses_and_adjustments: 0,
            stock_in_hand: 500,
            new_patient_count: 500,
            stock_out_days: 20,
            quantity_requested: 10000,
            reason_for_requested_quantity: "justbecause".to_string(),
        }],
        patient_quantification: vec![
            PatientBucket {
                category: "adult".to_string(),
                value: 100,
            },
            PatientBucket {
                category: "child".to_string(),
                value: 300,
            },
        ],
        regimens: [
            ("001", "REGIMEN1"),
            ("002", "REGIMEN2"),
            ("003", "REGIMEN3"),
            ("005", "REGIMEN5"),
            ("006", "REGIMEN6"),
        ]
        .into_iter()
        .map(|(code, name)| regimen(code, name))
        .collect(),
    }
}

fn regimen(code: &str, name: &str) -> Regimen {
    Regimen {
        code: code.to_string(),
        name: name.to_string(),
        patients_on_treatment: 200,
        patients_to_initiate_treatment: 200,
        patients_stopped_treatment: 200,
        patients_on_treatment_adult: 100,
        patients_to_initiate_treatment_adult: 100,
        patients_stopped_treatment_adult: 100,
        patients_on_treatment_children: 100,
        patients_to_initiate_treatment_children: 100,
        patients_stopped_treatment_children: 100,
        remarks: "remark".to_string(),
    }
}

/// Receipt, transfer and loss movements for product 08S42
pub fn stock_card_events() -> Vec<StockCardEvent> {
    [
        (1000, "CLINIC_RETURN", "20151010T030530Z"),
        (500, "TRANSFER_OUT", "20151014T030530Z"),
        (20, "STOLEN", "20151015T030530Z"),
    ]
    .into_iter()
    .filter_map(|(quantity, reason, occurred)| {
        NaiveDateTime::parse_from_str(occurred, basic_timestamp::FORMAT)
            .ok()
            .map(|occurred| StockCardEvent {
                facility_id: 408,
                product_code: "08S42".to_string(),
                quantity,
                reason_name: reason.to_string(),
                occurred,
            })
    })
    .collect()
}
