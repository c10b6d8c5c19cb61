pub mod board;
pub mod notices;
pub mod notifications;
pub mod requests;

pub use board::{MoveCardRequest, MoveCardResponse};
pub use notices::{NoticeResponse, PublishNoticeRequest};
pub use notifications::{
    MarkAllReadResponse, NotificationListParams, NotificationResponse, UnreadCountResponse,
};
pub use requests::{
    optional, required, DepartmentRequestResponse, RequestListParams, RequestListResponse,
    StockRequestResponse, SubmitDepartmentRequest, SubmitStockRequest, SubmitVacationRequest,
    VacationResponse,
};
