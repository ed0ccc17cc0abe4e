pub mod expense;
pub mod itinerary;
pub mod settlement;
pub mod traveler;
pub mod trip;
