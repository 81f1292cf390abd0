// Plant growth-condition analysis: cleaning, range compliance, trends and scoring
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
