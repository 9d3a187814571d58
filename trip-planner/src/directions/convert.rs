//! Conversion from directions DTOs to domain types.

use crate::domain::{LatLng, Leg, Route, Step, StepMode};

use super::types::{LatLngDto, LegDto, RouteDto, StepDto};

/// Convert a provider route into a domain route.
///
/// Step modes the planner does not route for are kept as
/// [`StepMode::Other`] rather than rejecting the route.
pub fn convert_route(dto: &RouteDto) -> Route {
    Route {
        legs: dto.legs.iter().map(convert_leg).collect(),
        overview_polyline: dto.overview_polyline.points.clone(),
        waypoint_order: dto.waypoint_order.clone(),
    }
}

fn convert_leg(dto: &LegDto) -> Leg {
    Leg {
        distance_meters: dto.distance.value,
        duration_seconds: dto.duration.value,
        start_address: dto.start_address.clone(),
        end_address: dto.end_address.clone(),
        steps: dto.steps.iter().map(convert_step).collect(),
    }
}

fn convert_step(dto: &StepDto) -> Step {
    Step {
        distance_meters: dto.distance.value,
        duration_seconds: dto.duration.value,
        instructions: dto.html_instructions.clone(),
        mode: StepMode::parse(&dto.travel_mode),
        start: convert_location(dto.start_location),
        end: convert_location(dto.end_location),
    }
}

fn convert_location(dto: LatLngDto) -> LatLng {
    LatLng::new(dto.lat, dto.lng)
}
