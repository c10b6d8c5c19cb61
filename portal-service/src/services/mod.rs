pub mod board;
pub mod database;
pub mod jwt;
pub mod metrics;
pub mod navigation;
pub mod notifier;

pub use self::board::{assemble_board, Board, BoardCard, BoardColumn, BoardService, CardMove, MoveOutcome};
pub use self::database::{PortalDb, StatusChange, BOARD_CARD_LIMIT};
pub use self::jwt::{StaffClaims, TokenService};
pub use self::metrics::{get_metrics, init_metrics, record_submission};
pub use self::navigation::{boards_for, build_navigation, NavCounts, NavEntry};
pub use self::notifier::{BoardEvent, BoardEvents, MongoNotifier, Notifier};
