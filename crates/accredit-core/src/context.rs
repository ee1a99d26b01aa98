//! Per-call ambient context.
//!
//! The host (ledger runtime, service framework) supplies the current clock
//! value and the identity of the caller with every operation. Nothing in the
//! registry reads a global clock or a global sender.

use serde::{Deserialize, Serialize};

use crate::types::{BlockHeight, Principal};

/// Clock value and caller identity for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Current clock value.
    pub height: BlockHeight,
    /// Who is calling.
    pub caller: Principal,
}

impl CallContext {
    /// Create a context for `caller` at `height`.
    pub fn new(height: u64, caller: impl Into<Principal>) -> Self {
        Self {
            height: BlockHeight::new(height),
            caller: caller.into(),
        }
    }

    /// Same caller, different height.
    pub fn at(&self, height: u64) -> Self {
        Self {
            height: BlockHeight::new(height),
            caller: self.caller.clone(),
        }
    }

    /// Same height, different caller.
    pub fn as_caller(&self, caller: impl Into<Principal>) -> Self {
        Self {
            height: self.height,
            caller: caller.into(),
        }
    }

    /// Whether the caller is `principal`.
    pub fn is_caller(&self, principal: &Principal) -> bool {
        &self.caller == principal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_derivation() {
        let ctx = CallContext::new(100, "controller");
        let later = ctx.at(150);
        let other = ctx.as_caller("someone-else");

        assert_eq!(later.height, BlockHeight::new(150));
        assert_eq!(later.caller, ctx.caller);
        assert_eq!(other.height, ctx.height);
        assert!(ctx.is_caller(&Principal::from("controller")));
        assert!(!other.is_caller(&Principal::from("controller")));
    }
}
