use wasm_bindgen::prelude::*;

mod app;
use app::YesNoWheel;

wheel_web::export_wheel!(YesNoWheel, "yes-no-wheel", vectors);
