//! Travel research tools
//!
//! Each tool renders a structured research brief for the model to work from.
//! They are deterministic and make no network calls; live booking-site APIs
//! would slot in behind the same handlers.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::{ToolHandler, json_schema};

fn required_str(input: &Value, field: &str) -> Result<String> {
    input
        .get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' parameter", field))
}

/// Search for flight prices and options to a destination
pub struct FlightSearchTool;

#[async_trait]
impl ToolHandler for FlightSearchTool {
    fn name(&self) -> &str {
        "search_flight_prices"
    }

    fn description(&self) -> &str {
        "Search for current flight prices and options to a destination, \
         drawing on major booking sites."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "destination": {
                    "type": "string",
                    "description": "Destination city or country"
                },
                "departure_city": {
                    "type": "string",
                    "description": "Departure city (default: New York)"
                }
            }),
            vec!["destination"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let destination = required_str(&input, "destination")?;
        let departure_city = input
            .get("departure_city")
            .and_then(|v| v.as_str())
            .unwrap_or("New York");

        Ok(format!(
            "Research task: find flights from {departure_city} to {destination}.\n\
             \n\
             Provide:\n\
             1. Current flight options with prices (Kayak, Skyscanner, Google Flights)\n\
             2. Airlines operating these routes\n\
             3. Flight durations and layover information\n\
             4. Best booking times and price trends\n\
             5. Seasonal pricing variations\n\
             \n\
             Focus on realistic, current pricing for the requested travel dates."
        ))
    }
}

/// Search for hotel options at a location
pub struct HotelSearchTool;

#[async_trait]
impl ToolHandler for HotelSearchTool {
    fn name(&self) -> &str {
        "search_hotel_options"
    }

    fn description(&self) -> &str {
        "Search for hotel availability, pricing, and guest reviews at a location."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "location": {
                    "type": "string",
                    "description": "City or area to find hotels in"
                },
                "check_in_date": {
                    "type": "string",
                    "description": "Check-in date"
                }
            }),
            vec!["location", "check_in_date"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let location = required_str(&input, "location")?;
        let check_in_date = required_str(&input, "check_in_date")?;

        Ok(format!(
            "Research task: find hotels in {location} for check-in {check_in_date}.\n\
             \n\
             Provide:\n\
             1. Top-rated hotels with guest reviews (Booking.com, TripAdvisor, Google Hotels)\n\
             2. Current pricing for the stay\n\
             3. Hotel amenities and facilities\n\
             4. Location details and proximity to attractions\n\
             5. Guest ratings and recommendation reasons\n\
             \n\
             Include budget, mid-range, and luxury options with realistic current prices."
        ))
    }
}

/// Search for attractions and activities at a destination
pub struct AttractionSearchTool;

#[async_trait]
impl ToolHandler for AttractionSearchTool {
    fn name(&self) -> &str {
        "search_attractions_activities"
    }

    fn description(&self) -> &str {
        "Search for attractions, tours, and activities at a destination."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "destination": {
                    "type": "string",
                    "description": "Destination to research attractions for"
                }
            }),
            vec!["destination"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let destination = required_str(&input, "destination")?;

        Ok(format!(
            "Research task: find attractions and activities in {destination}.\n\
             \n\
             Provide:\n\
             1. Top-rated attractions and their estimated visit times\n\
             2. Popular day tours and multi-day excursions\n\
             3. Outdoor activities (hiking, water sports, wildlife viewing)\n\
             4. Cultural sites and local experiences\n\
             5. Typical costs for tours and entrance fees\n\
             6. Best time to visit each location\n\
             7. Transportation options between sites\n\
             \n\
             Include hidden gems and less-known but highly-rated activities, and \
             keep the selection realistic for the trip duration."
        ))
    }
}

/// Search for travel cost and budgeting information
pub struct TravelCostTool;

#[async_trait]
impl ToolHandler for TravelCostTool {
    fn name(&self) -> &str {
        "search_travel_costs"
    }

    fn description(&self) -> &str {
        "Search for current travel costs: meals, transport, tours, and daily budgets."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "destination": {
                    "type": "string",
                    "description": "Destination to research costs for"
                }
            }),
            vec!["destination"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let destination = required_str(&input, "destination")?;

        Ok(format!(
            "Research task: find cost information for a trip to {destination}.\n\
             \n\
             Provide:\n\
             1. Average meal costs (budget, mid-range, restaurants)\n\
             2. Public transportation costs and rental car prices\n\
             3. Tour and activity pricing\n\
             4. Entrance fees for attractions\n\
             5. Estimated daily costs for different budget levels\n\
             6. Money-saving tips and best budget periods\n\
             7. Currency exchange rates and payment methods\n\
             \n\
             Provide realistic, current pricing a traveler can expect."
        ))
    }
}
