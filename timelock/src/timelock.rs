//! Role-gated delayed execution of call bundles

use crate::error::{Result, TimelockError};
use crate::events::TimelockEvent;
use crate::operation::{hash_operation_batch, OperationState, ScheduledOperation};
use crate::roles::Role;
use dao_core::{decode_call, Address, Call, CallError, CallTarget, Clock, Effect, EventSink, Hash32};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Calls the timelock accepts when it is itself the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelockCall {
    UpdateDelay { new_delay: u64 },
    GrantRole { role: Role, account: Address },
    RevokeRole { role: Role, account: Address },
}

enum Prepared {
    SelfCall(TimelockCall),
    External(Effect),
}

pub struct TimelockExecutor {
    address: Address,
    min_delay: u64,
    roles: HashMap<Role, HashSet<Address>>,
    operations: HashMap<Hash32, ScheduledOperation>,
    targets: HashMap<Address, Arc<dyn CallTarget>>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink<TimelockEvent>>,
}

impl TimelockExecutor {
    /// Include `Address::ZERO` in
    /// `executors` to let anyone execute ready operations.
    pub fn new(
        address: Address,
        min_delay: u64,
        proposers: &[Address],
        executors: &[Address],
        admin: Option<Address>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink<TimelockEvent>>,
    ) -> Self {
        let mut timelock = Self {
            address,
            min_delay,
            roles: HashMap::new(),
            operations: HashMap::new(),
            targets: HashMap::new(),
            clock,
            events,
        };

        timelock.insert_role(Role::Admin, address, address);
        if let Some(admin) = admin {
            timelock.insert_role(Role::Admin, admin, address);
        }
        for proposer in proposers {
            timelock.insert_role(Role::Proposer, *proposer, address);
        }
        for executor in executors {
            timelock.insert_role(Role::Executor, *executor, address);
        }

        tracing::info!(
            timelock = %address,
            min_delay,
            proposers = proposers.len(),
            executors = executors.len(),
            "timelock_initialized"
        );
        timelock
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn min_delay(&self) -> u64 {
        self.min_delay
    }

    /// Make `target` reachable from scheduled calls
    pub fn register_target(&mut self, address: Address, target: Arc<dyn CallTarget>) {
        self.targets.insert(address, target);
    }

    // ----- roles -----

    /// True if `account` holds `role`, or the role is open to everyone
    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.roles
            .get(&role)
            .map(|holders| holders.contains(account) || holders.contains(&Address::ZERO))
            .unwrap_or(false)
    }

    pub fn roles_of(&self, account: &Address) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| {
                self.roles
                    .get(role)
                    .map(|holders| holders.contains(account))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn grant_role(&mut self, caller: &Address, role: Role, account: &Address) -> Result<()> {
        self.check_role(Role::Admin, caller)?;
        self.insert_role(role, *account, *caller);
        Ok(())
    }

    pub fn revoke_role(&mut self, caller: &Address, role: Role, account: &Address) -> Result<()> {
        self.check_role(Role::Admin, caller)?;
        self.remove_role(role, *account, *caller)
    }

    /// Give up one of the caller's own roles
    pub fn renounce_role(&mut self, caller: &Address, role: Role) -> Result<()> {
        self.remove_role(role, *caller, *caller)
    }

    /// Only callable by the timelock itself, i.e. through a scheduled operation
    pub fn update_delay(&mut self, caller: &Address, new_delay: u64) -> Result<()> {
        if *caller != self.address {
            return Err(TimelockError::Unauthorized {
                caller: *caller,
                role: Role::Admin,
            });
        }
        let old_delay = std::mem::replace(&mut self.min_delay, new_delay);
        self.events.emit(TimelockEvent::MinDelayChanged {
            old_delay,
            new_delay,
        });
        tracing::info!(old_delay, new_delay, "timelock_min_delay_changed");
        Ok(())
    }

    fn check_role(&self, role: Role, caller: &Address) -> Result<()> {
        if self.has_role(role, caller) {
            Ok(())
        } else {
            Err(TimelockError::Unauthorized {
                caller: *caller,
                role,
            })
        }
    }

    fn insert_role(&mut self, role: Role, account: Address, sender: Address) {
        if self.roles.entry(role).or_default().insert(account) {
            self.events.emit(TimelockEvent::RoleGranted {
                role,
                account,
                sender,
            });
            tracing::info!(role = ?role, account = %account, sender = %sender, "role_granted");
        }
    }

    fn remove_role(&mut self, role: Role, account: Address, sender: Address) -> Result<()> {
        if role == Role::Admin && account == self.address {
            return Err(TimelockError::ProtectedRole);
        }
        let removed = self
            .roles
            .get_mut(&role)
            .map(|holders| holders.remove(&account))
            .unwrap_or(false);
        if removed {
            self.events.emit(TimelockEvent::RoleRevoked {
                role,
                account,
                sender,
            });
            tracing::info!(role = ?role, account = %account, sender = %sender, "role_revoked");
        }
        Ok(())
    }

    // ----- operations -----

    pub fn operation(&self, id: &Hash32) -> Option<&ScheduledOperation> {
        self.operations.get(id)
    }

    pub fn is_operation(&self, id: &Hash32) -> bool {
        self.operations.contains_key(id)
    }

    pub fn is_operation_pending(&self, id: &Hash32) -> bool {
        self.operations.get(id).map(|op| !op.executed).unwrap_or(false)
    }

    pub fn is_operation_ready(&self, id: &Hash32) -> bool {
        self.operation_state(id) == OperationState::Ready
    }

    pub fn is_operation_done(&self, id: &Hash32) -> bool {
        self.operations.get(id).map(|op| op.executed).unwrap_or(false)
    }

    /// Ready time of the operation, if scheduled
    pub fn timestamp(&self, id: &Hash32) -> Option<u64> {
        self.operations.get(id).map(|op| op.ready_at)
    }

    pub fn operation_state(&self, id: &Hash32) -> OperationState {
        match self.operations.get(id) {
            None => OperationState::Unset,
            Some(op) if op.executed => OperationState::Done,
            Some(op) if op.ready_at > self.clock.now() => OperationState::Waiting,
            Some(_) => OperationState::Ready,
        }
    }

    /// Schedule `calls` to become executable after `delay`
    pub fn schedule(
        &mut self,
        caller: &Address,
        calls: Vec<Call>,
        predecessor: Option<Hash32>,
        salt: Hash32,
        delay: u64,
    ) -> Result<Hash32> {
        self.check_role(Role::Proposer, caller)?;
        if calls.is_empty() {
            return Err(TimelockError::EmptyBatch);
        }

        let id = hash_operation_batch(&calls, predecessor.as_ref(), &salt);
        if let Some(existing) = self.operations.get(&id) {
            return Err(if existing.executed {
                TimelockError::AlreadyExecuted(id)
            } else {
                TimelockError::AlreadyScheduled(id)
            });
        }
        if delay < self.min_delay {
            return Err(TimelockError::InsufficientDelay {
                delay,
                min_delay: self.min_delay,
            });
        }

        let ready_at = self.clock.now().saturating_add(delay);
        let count = calls.len();
        self.operations.insert(
            id,
            ScheduledOperation {
                id,
                calls,
                predecessor,
                salt,
                scheduled_by: *caller,
                ready_at,
                executed: false,
            },
        );

        self.events.emit(TimelockEvent::OperationScheduled {
            id,
            calls: count,
            predecessor,
            ready_at,
        });
        tracing::info!(operation = %id.short(), calls = count, ready_at, "operation_scheduled");
        Ok(id)
    }

    /// Run a ready operation. Every call is prepared before any is
    /// committed, so a failing call leaves the operation pending and no
    /// target changed.
    pub fn execute(&mut self, caller: &Address, id: &Hash32) -> Result<()> {
        self.check_role(Role::Executor, caller)?;

        let op = self
            .operations
            .get(id)
            .ok_or(TimelockError::UnknownOperation(*id))?;
        if op.executed {
            return Err(TimelockError::AlreadyExecuted(*id));
        }
        let now = self.clock.now();
        if now < op.ready_at {
            return Err(TimelockError::NotReady {
                id: *id,
                ready_at: op.ready_at,
                now,
            });
        }
        if let Some(predecessor) = op.predecessor {
            if !self.is_operation_done(&predecessor) {
                return Err(TimelockError::MissingDependency(predecessor));
            }
        }

        let mut prepared = Vec::with_capacity(op.calls.len());
        for (index, call) in op.calls.iter().enumerate() {
            let step = self
                .prepare_call(call)
                .map_err(|source| TimelockError::CallFailed { index, source })?;
            prepared.push(step);
        }

        for step in prepared {
            match step {
                Prepared::SelfCall(call) => self.apply_self_call(call)?,
                Prepared::External(effect) => effect(),
            }
        }

        if let Some(op) = self.operations.get_mut(id) {
            op.executed = true;
        }
        self.events.emit(TimelockEvent::OperationExecuted { id: *id });
        tracing::info!(operation = %id.short(), executor = %caller, "operation_executed");
        Ok(())
    }

    fn prepare_call(&self, call: &Call) -> std::result::Result<Prepared, CallError> {
        if call.target == self.address {
            if call.value != 0 {
                return Err(CallError::NonPayable { value: call.value });
            }
            let message: TimelockCall = decode_call(&call.calldata)?;
            if let TimelockCall::RevokeRole {
                role: Role::Admin,
                account,
            } = &message
            {
                if *account == self.address {
                    return Err(CallError::Rejected(
                        "timelock cannot revoke its own admin role".to_string(),
                    ));
                }
            }
            return Ok(Prepared::SelfCall(message));
        }

        let target = self
            .targets
            .get(&call.target)
            .ok_or(CallError::UnknownTarget(call.target))?;
        target
            .prepare(&self.address, call.value, &call.calldata)
            .map(Prepared::External)
    }

    fn apply_self_call(&mut self, call: TimelockCall) -> Result<()> {
        let this = self.address;
        match call {
            TimelockCall::UpdateDelay { new_delay } => self.update_delay(&this, new_delay),
            TimelockCall::GrantRole { role, account } => self.grant_role(&this, role, &account),
            TimelockCall::RevokeRole { role, account } => self.revoke_role(&this, role, &account),
        }
    }
}
