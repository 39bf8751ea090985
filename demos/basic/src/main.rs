// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::error::Error;

use moonlift::{Options, Translator};

fn main() -> Result<(), Box<dyn Error>> {
    // This example demonstrates the two library entry points:
    // 1. The one-shot translate_source helper
    // 2. A Translator with options and warning inspection

    println!("=== One-shot translation ===");
    one_shot()?;

    println!("\n=== Translator with warnings ===");
    with_warnings()?;

    Ok(())
}

fn one_shot() -> Result<(), Box<dyn Error>> {
    let lua = r#"
Greeter = Object:extend()

function Greeter:init(name)
    self.name = name
end

function Greeter:hello()
    return "Hello, " .. self.name
end

local g = Greeter("world")
print(g:hello())
"#;

    let python = moonlift::translate_source(lua)?;
    println!("{}", python);
    Ok(())
}

fn with_warnings() -> Result<(), Box<dyn Error>> {
    // a method on a class that is never declared stays a plain function
    let lua = "function Ghost:speak() return 'boo' end";

    let mut translator = Translator::new(Options::default());
    let python = translator.translate_source(lua)?;
    println!("{}", python);
    for warning in translator.warnings() {
        println!("warning: {}", warning);
    }
    Ok(())
}
