mod product;
mod user;

pub use product::{
    CustomerTypeSelector, NewProductSpotlight, ProductWriteResult, SpotlightOverview,
};
pub use user::{UpdateUser, User};
