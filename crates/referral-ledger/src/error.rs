use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a referral proposal was refused.
///
/// The set is closed. Presentation layers map each variant to their own
/// user-facing wording; the ledger only ever hands back the symbol.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The referred member's account is not older than the age threshold.
    #[error("insufficient account age")]
    InsufficientAccountAge,

    /// Referrer and referred are the same identity.
    #[error("self referral")]
    SelfReferral,

    /// The referred member already has a referrer.
    #[error("already referred")]
    AlreadyReferred,

    /// The referred member previously referred the referrer.
    #[error("swap referral")]
    SwapReferral,

    /// The referrer was referred by the referred member. Admission folds
    /// this into the [`RejectReason::SwapReferral`] lookup; the variant stays
    /// so presentation layers keep a distinct message for it.
    #[error("circular referral")]
    CircularReferral,

    /// The referrer already lists the referred member.
    #[error("duplicate referral")]
    DuplicateReferral,
}

impl RejectReason {
    pub const ALL: [RejectReason; 6] = [
        RejectReason::InsufficientAccountAge,
        RejectReason::SelfReferral,
        RejectReason::AlreadyReferred,
        RejectReason::SwapReferral,
        RejectReason::CircularReferral,
        RejectReason::DuplicateReferral,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_serialize_as_snake_case_symbols() {
        let encoded = serde_json::to_string(&RejectReason::InsufficientAccountAge).unwrap();
        assert_eq!(encoded, "\"insufficient_account_age\"");
        let decoded: RejectReason = serde_json::from_str("\"swap_referral\"").unwrap();
        assert_eq!(decoded, RejectReason::SwapReferral);
    }
}
