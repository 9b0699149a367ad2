//! Interact with contracts: pick a contract, call it, sign, see the receipt

mod flow;
mod machine;
mod state;
mod wizard;

pub use flow::{InteractFlow, Step, StepAction, StepComponent, StepProps, STEP_COUNT};
pub use machine::{Collaborators, InteractWithContracts, DOMAIN_RESOLUTION_DELAY};
pub use state::{validate_contract_fields, InteractionState};
pub use wizard::Wizard;
