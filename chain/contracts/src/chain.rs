//! In-process chain runtime
//!
//! Plays the part of the blockchain around a single deployed
//! `VendingMachine`:
//! - Account balances for every address, including the contract's own
//! - Value attached to a call moves into the contract before it runs
//! - Each call commits fully or rolls back every balance and contract change
//! - Outbound transfers may invoke a registered `Receiver`, which can call
//!   back into the contract (re-entrancy)

use std::collections::HashMap;
use tracing::{debug, info, warn};
use types::ids::Address;
use types::numeric::Wei;

use crate::audit::SolvencyReport;
use crate::errors::{ChainError, TransferError, VendingError};
use crate::events::{ContractEvent, Deployed};
use crate::host::Host;
use crate::machine::{MachineConfig, VendingMachine};

/// Details of an incoming payment passed to a `Receiver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payment {
    pub recipient: Address,
    pub amount: Wei,
}

/// Code attached to an address that runs whenever it is paid.
///
/// `call` lets the receiver call back into the contract, as the paid
/// address, while the paying call is still in flight. Returning `Err`
/// rejects the payment.
pub trait Receiver {
    fn on_receive(&mut self, payment: Payment, call: Reentry<'_>) -> Result<(), TransferError>;
}

/// Nested calls a `Receiver` can make into the contract mid-transfer.
pub struct Reentry<'a> {
    caller: Address,
    machine: &'a mut VendingMachine,
    ledger: &'a mut Ledger,
}

impl Reentry<'_> {
    /// Address the nested calls are made from.
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Read-only view of the contract as it is mid-call.
    pub fn machine(&self) -> &VendingMachine {
        &*self.machine
    }

    pub fn withdraw(&mut self) -> Result<ContractEvent, VendingError> {
        self.machine.withdraw(self.caller, &mut *self.ledger)
    }

    pub fn purchase(&mut self, count: u64) -> Result<ContractEvent, VendingError> {
        self.machine.purchase(self.caller, count)
    }

    /// Nested deposit paid from the receiver's own balance.
    pub fn deposit(&mut self, value: Wei) -> Result<ContractEvent, ChainError> {
        let contract = self.ledger.contract;
        self.ledger.move_value(self.caller, contract, value)?;
        match self.machine.deposit(self.caller, value) {
            Ok(event) => Ok(event),
            Err(err) => {
                self.ledger.move_value(contract, self.caller, value)?;
                Err(err.into())
            }
        }
    }

    pub fn has_not_been_compromised(&self) -> bool {
        self.machine.has_not_been_compromised(&*self.ledger)
    }
}

/// Account balances plus receiver hooks. This is the `Host` the contract sees.
pub struct Ledger {
    contract: Address,
    balances: HashMap<Address, Wei>,
    receivers: HashMap<Address, Box<dyn Receiver>>,
}

impl Ledger {
    fn new(contract: Address) -> Self {
        Self {
            contract,
            balances: HashMap::new(),
            receivers: HashMap::new(),
        }
    }

    /// Balance of any address.
    pub fn balance_of(&self, account: &Address) -> Wei {
        self.balances.get(account).copied().unwrap_or(Wei::ZERO)
    }

    fn credit(&mut self, account: Address, amount: Wei) -> Option<()> {
        let balance = self.balance_of(&account).checked_add(amount)?;
        self.balances.insert(account, balance);
        Some(())
    }

    fn debit(&mut self, account: Address, amount: Wei) -> Option<()> {
        let balance = self.balance_of(&account).checked_sub(amount)?;
        self.balances.insert(account, balance);
        Some(())
    }

    /// Move value between externally owned accounts (no receiver hooks).
    fn move_value(&mut self, from: Address, to: Address, amount: Wei) -> Result<(), ChainError> {
        if amount.is_zero() {
            return Ok(());
        }
        let available = self.balance_of(&from);
        self.debit(from, amount)
            .ok_or(ChainError::InsufficientBalance {
                account: from,
                required: amount,
                available,
            })?;
        self.credit(to, amount).ok_or(ChainError::Overflow)
    }
}

impl Host for Ledger {
    fn self_balance(&self) -> Wei {
        self.balance_of(&self.contract)
    }

    fn transfer(
        &mut self,
        machine: &mut VendingMachine,
        to: Address,
        amount: Wei,
    ) -> Result<(), TransferError> {
        let saved_balances = self.balances.clone();
        let checkpoint = machine.checkpoint();

        self.debit(self.contract, amount)
            .ok_or(TransferError::InsufficientBalance)?;
        if self.credit(to, amount).is_none() {
            self.balances = saved_balances;
            return Err(TransferError::Overflow);
        }

        // The hook is taken out while it runs; nested payments to the same
        // address land as plain credits.
        if let Some(mut receiver) = self.receivers.remove(&to) {
            let outcome = receiver.on_receive(
                Payment {
                    recipient: to,
                    amount,
                },
                Reentry {
                    caller: to,
                    machine: &mut *machine,
                    ledger: &mut *self,
                },
            );
            self.receivers.insert(to, receiver);

            if let Err(err) = outcome {
                self.balances = saved_balances;
                machine.rollback(checkpoint);
                return Err(err);
            }
        }

        debug!(%to, %amount, "transfer delivered");
        Ok(())
    }
}

/// A chain with at most one vending machine deployed on it.
pub struct Chain {
    ledger: Ledger,
    machine: Option<VendingMachine>,
}

impl Chain {
    /// Create an empty chain whose contract will live at `contract`.
    pub fn new(contract: Address) -> Self {
        Self {
            ledger: Ledger::new(contract),
            machine: None,
        }
    }

    /// Genesis allocation: mint `amount` to `account`.
    pub fn fund(&mut self, account: Address, amount: Wei) -> Result<(), ChainError> {
        self.ledger
            .credit(account, amount)
            .ok_or(ChainError::Overflow)
    }

    /// Attach receiver code to `account`.
    pub fn register_receiver(&mut self, account: Address, receiver: Box<dyn Receiver>) {
        self.ledger.receivers.insert(account, receiver);
    }

    /// Balance of any address.
    pub fn balance_of(&self, account: &Address) -> Wei {
        self.ledger.balance_of(account)
    }

    pub fn contract_address(&self) -> Address {
        self.ledger.contract
    }

    // ───────────────────────── Deployment ─────────────────────────

    /// Deploy the contract with `value` as its reserve.
    pub fn deploy(&mut self, deployer: Address, value: Wei) -> Result<ContractEvent, ChainError> {
        self.deploy_with_config(deployer, value, MachineConfig::default())
    }

    /// Deploy with custom pricing.
    pub fn deploy_with_config(
        &mut self,
        deployer: Address,
        value: Wei,
        config: MachineConfig,
    ) -> Result<ContractEvent, ChainError> {
        if self.machine.is_some() {
            return Err(ChainError::AlreadyDeployed);
        }
        let contract = self.ledger.contract;
        self.ledger.move_value(deployer, contract, value)?;

        self.machine = Some(VendingMachine::with_config(deployer, value, config));

        info!(%deployer, %contract, reserve = %value.ether(), "contract deployed");
        Ok(ContractEvent::Deployed(Deployed {
            owner: deployer,
            reserve: value,
        }))
    }

    // ───────────────────────── Transactions ─────────────────────────

    /// Send `value` to the contract's `deposit`.
    pub fn deposit(&mut self, caller: Address, value: Wei) -> Result<ContractEvent, ChainError> {
        self.call(caller, value, |machine, _| machine.deposit(caller, value))
    }

    /// Call `purchase` (no value attached).
    pub fn purchase(&mut self, caller: Address, count: u64) -> Result<ContractEvent, ChainError> {
        self.call(caller, Wei::ZERO, |machine, _| machine.purchase(caller, count))
    }

    /// Call `withdraw` (no value attached).
    pub fn withdraw(&mut self, caller: Address) -> Result<ContractEvent, ChainError> {
        self.call(caller, Wei::ZERO, |machine, ledger| {
            machine.withdraw(caller, ledger)
        })
    }

    /// Call `restock` (no value attached).
    pub fn restock(&mut self, caller: Address, count: u64) -> Result<ContractEvent, ChainError> {
        self.call(caller, Wei::ZERO, |machine, _| machine.restock(caller, count))
    }

    /// Run one contract call atomically.
    ///
    /// Attached value moves to the contract first; on any error every
    /// balance and the machine's ledger state are restored, which refunds it.
    /// Events logged during the call are dropped.
    fn call<F>(&mut self, caller: Address, value: Wei, op: F) -> Result<ContractEvent, ChainError>
    where
        F: FnOnce(&mut VendingMachine, &mut Ledger) -> Result<ContractEvent, VendingError>,
    {
        let Chain { ledger, machine } = self;
        let machine = machine.as_mut().ok_or(ChainError::NotDeployed)?;

        let saved_balances = ledger.balances.clone();
        let checkpoint = machine.checkpoint();

        let contract = ledger.contract;
        let result = ledger
            .move_value(caller, contract, value)
            .and_then(|()| op(machine, ledger).map_err(ChainError::from));

        if let Err(err) = &result {
            warn!(%caller, error = %err, "call reverted");
            ledger.balances = saved_balances;
            machine.rollback(checkpoint);
        }
        result
    }

    // ───────────────────────── Queries ─────────────────────────

    /// The deployed contract.
    pub fn machine(&self) -> Result<&VendingMachine, ChainError> {
        self.machine.as_ref().ok_or(ChainError::NotDeployed)
    }

    /// Solvency check against the contract's real balance.
    pub fn has_not_been_compromised(&self) -> Result<bool, ChainError> {
        Ok(self.machine()?.has_not_been_compromised(&self.ledger))
    }

    /// Full solvency report.
    pub fn audit(&self) -> Result<SolvencyReport, ChainError> {
        Ok(self.machine()?.audit(&self.ledger))
    }
}
