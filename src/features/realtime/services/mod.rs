mod aggregator;
mod sources;

pub use aggregator::{Aggregator, AggregatorSources};
pub use sources::{
    load, DisasterSource, EmergencySource, FeedSource, ReportSource, ShelterSource,
    SocialSource, WeatherSource,
};
