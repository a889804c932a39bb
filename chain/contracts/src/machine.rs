//! Vending Machine — deposit custody, peanut inventory, and withdrawals
//!
//! Implements the ledger-inventory contract:
//! - Owner and reserve fixed at construction
//! - Consumer deposits with a minimum, credited per address
//! - Peanut purchases paid out of the credited balance (ledger-only)
//! - Full-balance withdrawal through the injected `Host`
//! - Owner-only restocking
//! - Constant-time solvency check against the real held balance
//!
//! Every operation either commits all of its updates or returns an error
//! with the state untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use types::ids::Address;
use types::numeric::Wei;

use crate::audit::SolvencyReport;
use crate::errors::VendingError;
use crate::events::{
    ContractEvent, Deployed, Deposited, PeanutsPurchased, Restocked, Withdrawn,
};
use crate::host::Host;
use crate::security::Ownable;

/// Price of one peanut: 0.1 ether.
pub const UNIT_PRICE: Wei = Wei::new(100_000_000_000_000_000);

/// Smallest accepted deposit: 0.1 ether.
pub const MINIMUM_DEPOSIT: Wei = Wei::new(100_000_000_000_000_000);

/// Pricing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Cost of one peanut
    pub unit_price: Wei,
    /// Deposits below this are rejected in full
    pub minimum_deposit: Wei,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            unit_price: UNIT_PRICE,
            minimum_deposit: MINIMUM_DEPOSIT,
        }
    }
}

/// The vending machine contract state.
///
/// `outstanding` is a running total of all `deposits` entries, maintained by
/// `deposit`, `purchase` and `withdraw`, so the solvency check never walks
/// the deposit map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendingMachine {
    /// Owner-only access control
    ownable: Ownable,
    /// Operator float attached at construction
    reserve: Wei,
    /// Credited balance per consumer
    deposits: HashMap<Address, Wei>,
    /// Peanuts bought per consumer
    purchased: HashMap<Address, u64>,
    /// Peanuts available for sale
    stock: u64,
    /// Sum of all `deposits` values
    outstanding: Wei,
    config: MachineConfig,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl VendingMachine {
    /// Construct the contract for `owner` holding `reserve`.
    pub fn new(owner: Address, reserve: Wei) -> Self {
        Self::with_config(owner, reserve, MachineConfig::default())
    }

    /// Construct with custom pricing.
    pub fn with_config(owner: Address, reserve: Wei, config: MachineConfig) -> Self {
        info!(%owner, reserve = %reserve.ether(), "vending machine constructed");
        Self {
            ownable: Ownable::new(owner),
            reserve,
            deposits: HashMap::new(),
            purchased: HashMap::new(),
            stock: 0,
            outstanding: Wei::ZERO,
            config,
            events: vec![ContractEvent::Deployed(Deployed { owner, reserve })],
        }
    }

    // ───────────────────────── Deposit ─────────────────────────

    /// Credit `amount` attached by `caller`.
    ///
    /// The host has already moved the asset into the contract; on `Err` it
    /// must refund it.
    pub fn deposit(
        &mut self,
        caller: Address,
        amount: Wei,
    ) -> Result<ContractEvent, VendingError> {
        if amount < self.config.minimum_deposit {
            warn!(%caller, %amount, "deposit below minimum rejected");
            return Err(VendingError::InsufficientDeposit {
                minimum: self.config.minimum_deposit,
            });
        }

        let balance = self
            .consumer_deposit_of(&caller)
            .checked_add(amount)
            .ok_or(VendingError::Overflow)?;
        let outstanding = self
            .outstanding
            .checked_add(amount)
            .ok_or(VendingError::Overflow)?;

        self.deposits.insert(caller, balance);
        self.outstanding = outstanding;

        debug!(%caller, %amount, %balance, "deposit credited");
        Ok(self.emit(ContractEvent::Deposited(Deposited {
            account: caller,
            amount,
            balance,
        })))
    }

    // ───────────────────────── Purchase ─────────────────────────

    /// Buy `count` peanuts out of the caller's credited balance.
    ///
    /// Only the ledger moves: the paid amount leaves the caller's balance
    /// and the outstanding total, but no asset leaves the contract.
    pub fn purchase(
        &mut self,
        caller: Address,
        count: u64,
    ) -> Result<ContractEvent, VendingError> {
        if count == 0 {
            return Err(VendingError::InvalidCount);
        }
        if self.stock < count {
            warn!(%caller, count, stock = self.stock, "purchase exceeds stock");
            return Err(VendingError::InsufficientStock {
                requested: count,
                available: self.stock,
            });
        }

        let cost = self
            .config
            .unit_price
            .checked_mul(count)
            .ok_or(VendingError::Overflow)?;
        let available = self.consumer_deposit_of(&caller);
        let remaining = available.checked_sub(cost).ok_or_else(|| {
            warn!(%caller, %cost, %available, "purchase exceeds credited balance");
            VendingError::InsufficientFunds {
                required: cost,
                available,
            }
        })?;
        let bought = self
            .purchased_count_of(&caller)
            .checked_add(count)
            .ok_or(VendingError::Overflow)?;
        let outstanding = self
            .outstanding
            .checked_sub(cost)
            .ok_or(VendingError::Overflow)?;
        let stock = self.stock - count;

        self.deposits.insert(caller, remaining);
        self.purchased.insert(caller, bought);
        self.stock = stock;
        self.outstanding = outstanding;

        debug!(%caller, count, %cost, stock, "peanuts purchased");
        Ok(self.emit(ContractEvent::PeanutsPurchased(PeanutsPurchased {
            account: caller,
            count,
            cost,
            remaining_stock: stock,
        })))
    }

    // ───────────────────────── Withdraw ─────────────────────────

    /// Pay the caller's whole credited balance back through `host`.
    ///
    /// The balance is zeroed before `host.transfer` runs, so a re-entrant
    /// call from the recipient sees nothing left to withdraw. A zero balance
    /// is a successful no-op: the `Withdrawn` event of amount zero is
    /// returned but not logged. A failed transfer restores the balance.
    pub fn withdraw<H: Host + ?Sized>(
        &mut self,
        caller: Address,
        host: &mut H,
    ) -> Result<ContractEvent, VendingError> {
        let amount = self.consumer_deposit_of(&caller);
        if amount.is_zero() {
            debug!(%caller, "withdraw with empty balance");
            return Ok(ContractEvent::Withdrawn(Withdrawn {
                account: caller,
                amount,
            }));
        }

        let outstanding = self
            .outstanding
            .checked_sub(amount)
            .ok_or(VendingError::Overflow)?;

        // Effects strictly before the interaction.
        self.deposits.insert(caller, Wei::ZERO);
        self.outstanding = outstanding;

        if let Err(err) = host.transfer(self, caller, amount) {
            warn!(%caller, %amount, error = %err, "withdraw transfer failed, restoring balance");
            self.restore_credit(caller, amount)?;
            return Err(VendingError::TransferFailed(err));
        }

        debug!(%caller, %amount, "balance withdrawn");
        Ok(self.emit(ContractEvent::Withdrawn(Withdrawn {
            account: caller,
            amount,
        })))
    }

    fn restore_credit(&mut self, caller: Address, amount: Wei) -> Result<(), VendingError> {
        let balance = self
            .consumer_deposit_of(&caller)
            .checked_add(amount)
            .ok_or(VendingError::Overflow)?;
        let outstanding = self
            .outstanding
            .checked_add(amount)
            .ok_or(VendingError::Overflow)?;
        self.deposits.insert(caller, balance);
        self.outstanding = outstanding;
        Ok(())
    }

    // ───────────────────────── Restock ─────────────────────────

    /// Add `count` peanuts to the inventory. Owner-only.
    pub fn restock(
        &mut self,
        caller: Address,
        count: u64,
    ) -> Result<ContractEvent, VendingError> {
        if let Err(err) = self.ownable.only_owner(&caller) {
            warn!(%caller, "restock by non-owner rejected");
            return Err(err);
        }
        if count == 0 {
            return Err(VendingError::InvalidCount);
        }

        let stock = self
            .stock
            .checked_add(count)
            .ok_or(VendingError::Overflow)?;
        self.stock = stock;

        info!(count, stock, "peanuts restocked");
        Ok(self.emit(ContractEvent::Restocked(Restocked { count, stock })))
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Reserve attached at construction.
    pub fn reserve_amount(&self) -> Wei {
        self.reserve
    }

    /// Peanuts available for sale.
    pub fn inventory_balance(&self) -> u64 {
        self.stock
    }

    /// Credited balance of `account` (zero if it never deposited).
    pub fn consumer_deposit_of(&self, account: &Address) -> Wei {
        self.deposits.get(account).copied().unwrap_or(Wei::ZERO)
    }

    /// Peanuts bought by `account` so far.
    pub fn purchased_count_of(&self, account: &Address) -> u64 {
        self.purchased.get(account).copied().unwrap_or(0)
    }

    /// Running total of all credited deposits.
    pub fn outstanding_deposits(&self) -> Wei {
        self.outstanding
    }

    /// Recompute the deposit total by walking every entry.
    ///
    /// O(number of depositors). Used to cross-check `outstanding_deposits`.
    pub fn ledger_total(&self) -> Option<Wei> {
        self.deposits
            .values()
            .try_fold(Wei::ZERO, |acc, balance| acc.checked_add(*balance))
    }

    pub fn owner(&self) -> Address {
        self.ownable.owner()
    }

    pub fn unit_price(&self) -> Wei {
        self.config.unit_price
    }

    pub fn minimum_deposit(&self) -> Wei {
        self.config.minimum_deposit
    }

    /// Unit price in ether, for display.
    pub fn unit_price_ether(&self) -> Option<Decimal> {
        self.config.unit_price.to_ether().ok()
    }

    /// Held assets versus reserve plus outstanding deposits.
    pub fn audit<H: Host + ?Sized>(&self, host: &H) -> SolvencyReport {
        SolvencyReport {
            held: host.self_balance(),
            reserve: self.reserve,
            outstanding: self.outstanding,
        }
    }

    /// `true` iff the held balance covers the reserve and every deposit.
    ///
    /// Constant-time: relies on the running total, not a map walk.
    pub fn has_not_been_compromised<H: Host + ?Sized>(&self, host: &H) -> bool {
        let report = self.audit(host);
        if !report.is_solvent() {
            warn!(
                held = %report.held,
                shortfall = %report.shortfall(),
                "held balance below obligations"
            );
            return false;
        }
        true
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: ContractEvent) -> ContractEvent {
        self.events.push(event.clone());
        event
    }

    // ───────────────────────── Rollback ─────────────────────────

    /// Save the mutable ledger state for a later `rollback`.
    ///
    /// The event log is append-only during a call, so only its length is
    /// kept; the cost does not grow with history.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            deposits: self.deposits.clone(),
            purchased: self.purchased.clone(),
            stock: self.stock,
            outstanding: self.outstanding,
            events_len: self.events.len(),
        }
    }

    /// Restore the state saved by `checkpoint`, dropping later events.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.deposits = checkpoint.deposits;
        self.purchased = checkpoint.purchased;
        self.stock = checkpoint.stock;
        self.outstanding = checkpoint.outstanding;
        self.events.truncate(checkpoint.events_len);
    }
}

/// Ledger state saved before a call. Owner, reserve and pricing never
/// change after construction and are not included.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    deposits: HashMap<Address, Wei>,
    purchased: HashMap<Address, u64>,
    stock: u64,
    outstanding: Wei,
    events_len: usize,
}

#[cfg(test)]
impl Checkpoint {
    /// Map entries copied into this checkpoint.
    fn entries(&self) -> usize {
        self.deposits.len() + self.purchased.len()
    }
}
