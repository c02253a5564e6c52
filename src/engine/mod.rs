pub mod expansion;
pub mod filter;
pub mod highlight;
pub mod traverse;
pub mod view;
