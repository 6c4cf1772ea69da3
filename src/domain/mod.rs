// Domain layer: the scraped record, the selector rules and the ports the
// scraping core talks through.

pub mod model;
pub mod ports;
