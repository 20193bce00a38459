// Job recommendations: provider clients (Apify actors), the schema-less
// field resolver, and card normalization for the UI.

pub mod apify;
pub mod cards;
pub mod handlers;
pub mod providers;
pub mod recommend;
pub mod resolver;
