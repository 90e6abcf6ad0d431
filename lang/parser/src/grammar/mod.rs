use lalrpop_util::lalrpop_mod;

pub mod util;

lalrpop_mod!(
    #[allow(clippy::all)]
    #[allow(unused_imports)]
    #[allow(dead_code)]
    pub php, "/grammar/php.rs"
);
