pub mod expense_store;
pub mod itinerary_store;
pub mod traveler_store;
