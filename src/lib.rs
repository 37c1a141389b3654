// Alpha-beta search core plus a cozy-chess collaborator to drive it
pub mod board;
pub mod perft;
pub mod search;
