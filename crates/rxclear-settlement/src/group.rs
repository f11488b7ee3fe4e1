//! Atomic operation groups.
//!
//! An atomic group is an ordered list of [`Operation`]s that either all
//! take effect or none do. Operations are a closed tagged union — there is
//! no dynamic dispatch at this boundary, and every field is validated where
//! it is consumed.
//!
//! [`GroupContext`] is the **only** seam through which the settlement
//! engine sees group structure: a read-only view over the currently
//! executing group. It borrows the live operation slice, so a stale or
//! historical group can never be consulted for authorization.

use rxclear_types::{Address, Amount, AssetId, ClaimKey};
use serde::{Deserialize, Serialize};

/// Arguments of a settlement call.
///
/// The rebate split is **not** part of the request: the engine re-derives
/// the fee from `rebate_amount` and its own capped rate, never trusting a
/// caller-supplied split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// The claim to settle.
    pub claim_key: ClaimKey,
    /// Total rebate to pay out, in micro-USD.
    pub rebate_amount: Amount,
    /// The pharmacy's receiving address.
    pub payee_address: Address,
    /// The fee collector's address.
    pub fee_recipient_address: Address,
    /// Group position of the oracle's authorization payment.
    pub auth_op_index: u64,
}

/// One operation within an atomic group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// A native-currency payment. The only operation kind that can carry
    /// a settlement authorization.
    Payment {
        sender: Address,
        receiver: Address,
        amount: Amount,
    },
    /// An asset transfer. Transfers addressed to the escrow in its
    /// settlement asset fund the vault.
    AssetTransfer {
        sender: Address,
        receiver: Address,
        asset_id: AssetId,
        amount: Amount,
    },
    /// A settlement call into the engine.
    SettleClaim(SettlementRequest),
}

/// The kind of an operation, for boundary checks and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Payment,
    AssetTransfer,
    SettleClaim,
}

impl Operation {
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Payment { .. } => OperationKind::Payment,
            Self::AssetTransfer { .. } => OperationKind::AssetTransfer,
            Self::SettleClaim(_) => OperationKind::SettleClaim,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payment => write!(f, "PAYMENT"),
            Self::AssetTransfer => write!(f, "ASSET_TRANSFER"),
            Self::SettleClaim => write!(f, "SETTLE_CLAIM"),
        }
    }
}

/// Read-only view of the currently executing atomic group.
///
/// Injected into the settlement engine's entry point; group-structure
/// knowledge enters the core nowhere else.
#[derive(Debug, Clone, Copy)]
pub struct GroupContext<'a> {
    ops: &'a [Operation],
    current_index: usize,
}

impl<'a> GroupContext<'a> {
    /// View the group from the perspective of the operation at
    /// `current_index`.
    #[must_use]
    pub fn new(ops: &'a [Operation], current_index: usize) -> Self {
        debug_assert!(current_index < ops.len(), "current index out of group");
        Self { ops, current_index }
    }

    /// Number of operations in the group.
    #[must_use]
    pub fn group_size(&self) -> usize {
        self.ops.len()
    }

    /// Position of the operation currently executing.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The operation at a caller-specified position, if in bounds.
    #[must_use]
    pub fn operation_at(&self, index: u64) -> Option<&'a Operation> {
        usize::try_from(index).ok().and_then(|i| self.ops.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 32])
    }

    fn sample_group() -> Vec<Operation> {
        vec![
            Operation::Payment {
                sender: addr(1),
                receiver: addr(2),
                amount: Amount::new(1_000),
            },
            Operation::SettleClaim(SettlementRequest {
                claim_key: ClaimKey::from_bytes([9u8; 32]),
                rebate_amount: Amount::new(15_000_000),
                payee_address: addr(3),
                fee_recipient_address: addr(4),
                auth_op_index: 0,
            }),
        ]
    }

    #[test]
    fn context_exposes_group_shape() {
        let ops = sample_group();
        let ctx = GroupContext::new(&ops, 1);
        assert_eq!(ctx.group_size(), 2);
        assert_eq!(ctx.current_index(), 1);
    }

    #[test]
    fn operation_at_in_and_out_of_bounds() {
        let ops = sample_group();
        let ctx = GroupContext::new(&ops, 1);
        assert!(matches!(
            ctx.operation_at(0),
            Some(Operation::Payment { .. })
        ));
        assert!(ctx.operation_at(2).is_none());
        assert!(ctx.operation_at(u64::MAX).is_none());
    }

    #[test]
    fn operation_kinds() {
        let ops = sample_group();
        assert_eq!(ops[0].kind(), OperationKind::Payment);
        assert_eq!(ops[1].kind(), OperationKind::SettleClaim);
        assert_eq!(format!("{}", ops[0].kind()), "PAYMENT");
    }

    #[test]
    fn request_serde_roundtrip() {
        let ops = sample_group();
        let json = serde_json::to_string(&ops).unwrap();
        let back: Vec<Operation> = serde_json::from_str(&json).unwrap();
        assert_eq!(ops, back);
    }
}
