pub mod extraction;
pub mod fallback;
pub mod generation_client;
pub mod section_schema;
pub mod synthesis_service;
pub mod traversal_service;
