//! Domain layer: declarations, voters and decision managers.

pub mod declaration;
pub mod manager;
pub mod voter;

pub use declaration::{Combinator, DeclarationKey, SecurityDeclaration};
pub use manager::DecisionManager;
pub use voter::{AccessVoter, OwnerVoter, RightsVoter, Voter};
