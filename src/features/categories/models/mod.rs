mod category;

pub use category::{
    Category, CategoryRef, CategoryView, CategoryWithSharing, SHARED_WITH_ME_COLOR,
    SHARED_WITH_ME_ID, SHARED_WITH_ME_NAME,
};
