// Cover letter generation: company profile fetch → field extraction → template.
// The fetch is the only network call in the service; extraction is pluggable.

pub mod composer;
pub mod extraction;
pub mod fetcher;
pub mod handlers;
