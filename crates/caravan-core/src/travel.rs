//! The travel planning crew
//!
//! Four personas (flight specialist, accommodation specialist, travel
//! planner, financial advisor) and the ordered research tasks they run.
//! Task sequence: flights, hotels, itinerary, budget; each builds on the
//! findings before it.

use crate::agent::Agent;
use crate::crew::Crew;
use crate::task::Task;

/// The trip being planned, interpolated into every task prompt
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub destination: String,
    pub departure_city: String,
    pub dates: String,
    pub duration_days: u32,
    pub travelers: u32,
    pub budget_preference: String,
}

impl Default for TripRequest {
    fn default() -> Self {
        Self {
            destination: "Iceland".to_string(),
            departure_city: "New York".to_string(),
            dates: "January 15-20, 2025".to_string(),
            duration_days: 5,
            travelers: 2,
            budget_preference: "mid-range".to_string(),
        }
    }
}

impl TripRequest {
    /// Render the request as the context block shared by every task
    pub fn context(&self) -> String {
        format!(
            "Destination: {}\n\
             Departure city: {}\n\
             Dates: {}\n\
             Duration: {} days\n\
             Travelers: {}\n\
             Budget preference: {}",
            self.destination,
            self.departure_city,
            self.dates,
            self.duration_days,
            self.travelers,
            self.budget_preference,
        )
    }
}

/// The four travel planning personas
pub fn travel_agents() -> Vec<Agent> {
    vec![
        Agent::new(
            "Flight Specialist",
            "Research and recommend the best flight options for the trip, \
             balancing dates, airlines, prices, and flight durations against \
             current data from flight booking sites.",
            "You are an experienced flight specialist with deep knowledge of \
             airline schedules, pricing patterns, and travel routes. You have \
             booked thousands of flights, know the best times to fly, and \
             always ground recommendations in current booking-site data.",
        )
        .with_tools(&["search_flight_prices"]),
        Agent::new(
            "Accommodation Specialist",
            "Suggest top-rated hotels for the trip duration, weighing \
             amenities, location, and value for money against current prices \
             and guest reviews.",
            "You are a seasoned accommodation expert with extensive knowledge \
             of hotels worldwide. You read reviews meticulously, match \
             travelers with the right stay for their budget, and always check \
             current availability and real guest feedback.",
        )
        .with_tools(&["search_hotel_options"]),
        Agent::new(
            "Travel Planner",
            "Create a detailed day-by-day plan of activities and attractions \
             that makes the most of the trip, using current information about \
             opening hours, accessibility, and travel times.",
            "You are a creative travel planner who knows every hidden gem at \
             the destination. Your itineraries are well-paced, exciting, and \
             realistic: you account for travel times, weather, and traveler \
             preferences, and you verify attraction details before relying on \
             them.",
        )
        .with_tools(&["search_attractions_activities"]),
        Agent::new(
            "Financial Advisor",
            "Calculate total trip costs from the crew's findings and identify \
             savings that do not compromise the experience, using current \
             pricing for every line item.",
            "You are a meticulous financial advisor specializing in travel \
             budgeting. You analyze costs across flights, accommodation, \
             activities, and meals, surface hidden expenses, and build \
             realistic estimates from actual current prices.",
        )
        .with_tools(&["search_travel_costs"]),
    ]
}

/// The ordered research tasks for a trip
pub fn travel_tasks(request: &TripRequest) -> Vec<Task> {
    vec![
        Task::new(
            "flight_research",
            format!(
                "Research and compile flight options from {} to {} for the \
                 trip dates ({}). Find at least 2-3 options from major \
                 airlines with departure and arrival times, duration, and \
                 realistic current prices, then recommend the best value \
                 considering both price and convenience.",
                request.departure_city, request.destination, request.dates
            ),
            "A detailed report with 2-3 flight options including airlines, \
             times, duration, current prices, and a reasoned recommendation",
            "Flight Specialist",
        ),
        Task::new(
            "hotel_research",
            format!(
                "Based on the trip dates ({}), find and recommend the top 3-4 \
                 hotels in {} suitable for {} travelers. For each hotel give \
                 the name, guest rating, price per night, amenities, and why \
                 it suits this trip. Cover budget, mid-range, and luxury \
                 options with the emphasis on {} stays.",
                request.dates,
                request.destination,
                request.travelers,
                request.budget_preference
            ),
            "A curated list of 3-4 hotel recommendations with ratings, \
             nightly prices, amenities, and per-hotel reasoning",
            "Accommodation Specialist",
        ),
        Task::new(
            "itinerary_planning",
            format!(
                "Create a detailed {}-day itinerary for {} ({}). Plan \
                 day-by-day activities around real attractions with estimated \
                 travel times, activity durations, entry fees, and \
                 recommended visit times. Account for seasonal weather and \
                 keep the pace realistic.",
                request.duration_days, request.destination, request.dates
            ),
            "A day-by-day itinerary with activities, realistic travel times, \
             durations, entry fees, and practical seasonal tips",
            "Travel Planner",
        ),
        Task::new(
            "budget_analysis",
            format!(
                "Using the flight options, hotel recommendations, and \
                 itinerary produced by the other crew members, calculate a \
                 comprehensive budget for the {}-day trip to {} for {} \
                 travelers. Itemize flights, accommodation, meals, activities, \
                 and local transport; give totals for budget, mid-range, and \
                 luxury levels; and suggest concrete cost-saving steps.",
                request.duration_days, request.destination, request.travelers
            ),
            "A comprehensive budget report with itemized costs, totals at \
             three budget levels, and evidence-based savings recommendations",
            "Financial Advisor",
        ),
    ]
}

/// Assemble the full travel planning crew for a request
pub fn travel_crew(request: &TripRequest) -> anyhow::Result<Crew> {
    Crew::sequential(travel_agents(), travel_tasks(request))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_agents_with_one_tool_each() {
        let agents = travel_agents();
        assert_eq!(agents.len(), 4);
        for agent in &agents {
            assert_eq!(agent.tools.len(), 1, "agent {} should have one tool", agent.role);
        }
    }

    #[test]
    fn test_tasks_reference_known_agents() {
        let request = TripRequest::default();
        let crew = travel_crew(&request).unwrap();
        assert_eq!(crew.agent_count(), 4);
        assert_eq!(crew.task_count(), 4);
    }

    #[test]
    fn test_tasks_interpolate_request() {
        let request = TripRequest {
            destination: "Portugal".to_string(),
            departure_city: "Chicago".to_string(),
            dates: "March 3-10, 2026".to_string(),
            duration_days: 7,
            travelers: 3,
            budget_preference: "budget".to_string(),
        };
        let tasks = travel_tasks(&request);
        assert!(tasks[0].description.contains("Chicago to Portugal"));
        assert!(tasks[1].description.contains("3 travelers"));
        assert!(tasks[2].description.contains("7-day itinerary"));
        assert!(tasks[3].description.contains("Portugal"));
    }

    #[test]
    fn test_budget_task_runs_last() {
        let tasks = travel_tasks(&TripRequest::default());
        assert_eq!(tasks.last().unwrap().agent, "Financial Advisor");
    }

    #[test]
    fn test_context_includes_all_fields() {
        let request = TripRequest::default();
        let context = request.context();
        assert!(context.contains("Iceland"));
        assert!(context.contains("New York"));
        assert!(context.contains("5 days"));
        assert!(context.contains("mid-range"));
    }
}
