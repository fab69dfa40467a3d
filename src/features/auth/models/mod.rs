mod mock_user;

pub use mock_user::*;
