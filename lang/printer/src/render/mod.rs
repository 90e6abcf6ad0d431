mod termcolor;

pub use termcolor::RenderTermcolor;
