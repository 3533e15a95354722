pub mod elitist;
pub mod roulette;
pub mod selection_strategy;
pub mod tournament;

pub use elitist::ElitistSelection;
pub use roulette::RouletteWheelSelection;
pub use selection_strategy::{pool_size, SelectionStrategy};
pub use tournament::TournamentSelection;
