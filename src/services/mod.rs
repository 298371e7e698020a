mod use_cases;

pub use use_cases::{GetItemUseCase, GetTempUrlUseCase, RemoveItemUseCase, SetItemUseCase};
