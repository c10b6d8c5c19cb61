pub mod board;
pub mod health;
pub mod navigation;
pub mod notices;
pub mod notifications;
pub mod requests;

pub use board::{board_events, get_board, move_card};
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use navigation::get_navigation;
pub use notices::{archive_notice, list_notices, publish_notice};
pub use notifications::{list_notifications, mark_all_read, mark_read, unread_count};
pub use requests::{
    get_department_request, get_stock_request, get_vacation, list_department_requests,
    list_stock_requests, list_vacations, submit_department_request, submit_stock_request,
    submit_vacation,
};
