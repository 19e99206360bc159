mod api_test;
mod error_scenarios;
mod pipeline_test;
