pub mod itinerary_service;
pub mod settlement_service;
