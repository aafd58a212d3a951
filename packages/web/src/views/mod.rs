mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod upload;
pub use upload::Upload;

mod unauthorized;
pub use unauthorized::Unauthorized;

mod admin_users;
pub use admin_users::AdminUsers;

mod user_images;
pub use user_images::UserImages;
