use std::fmt;
use std::str::FromStr;

use crate::error::ChaincodeError;

/// Operations the chaincode dispatches on, by transaction function name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateRecord,
    UpdateRecord,
    GetRecord,
    AddCarePlan,
    AddPrescription,
    GetAppointments,
    GetAnalytics,
    AnonymizeRecord,
    DeleteRecord,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Self::CreateRecord,
        Self::UpdateRecord,
        Self::GetRecord,
        Self::AddCarePlan,
        Self::AddPrescription,
        Self::GetAppointments,
        Self::GetAnalytics,
        Self::AnonymizeRecord,
        Self::DeleteRecord,
    ];

    /// Function name as submitted in a transaction proposal.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRecord => "createRecord",
            Self::UpdateRecord => "updateRecord",
            Self::GetRecord => "getRecord",
            Self::AddCarePlan => "AddCarePlan",
            Self::AddPrescription => "AddPrescription",
            Self::GetAppointments => "GetAppointments",
            Self::GetAnalytics => "GetAnalytics",
            Self::AnonymizeRecord => "AnonymizeRecord",
            Self::DeleteRecord => "DeleteRecord",
        }
    }

    /// Names of the positional arguments, in order.
    pub fn params(&self) -> &'static [&'static str] {
        match self {
            Self::CreateRecord => &["userID", "data", "type"],
            Self::UpdateRecord => &["recordID", "newData"],
            Self::GetRecord => &["recordID"],
            Self::AddCarePlan => &["userID", "carePlan"],
            Self::AddPrescription => &["userID", "prescription"],
            Self::GetAppointments
            | Self::GetAnalytics
            | Self::AnonymizeRecord
            | Self::DeleteRecord => &["userID"],
        }
    }

    /// Whether the operation claims a nonce and writes a record.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::CreateRecord | Self::UpdateRecord | Self::AddCarePlan | Self::AddPrescription
        )
    }

    /// Whether the operation requires the prescriber role.
    pub fn is_role_gated(&self) -> bool {
        matches!(self, Self::AddCarePlan | Self::AddPrescription)
    }

    /// The error for a call with the wrong number of arguments.
    pub fn arity_error(&self) -> ChaincodeError {
        ChaincodeError::Arguments {
            expected: self.params().join(", "),
        }
    }
}

impl FromStr for Operation {
    type Err = ChaincodeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| ChaincodeError::UnknownFunction(name.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
