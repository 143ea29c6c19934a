mod health;
mod records;
mod redirects;

pub use health::{health_handler, not_found_handler};
pub use records::record_link_handler;
pub use redirects::{
    create_redirect_handler, delete_redirect_handler, get_redirect_handler,
    list_redirects_handler, move_down_handler, move_up_handler, repair_handler, swap_handler,
};
