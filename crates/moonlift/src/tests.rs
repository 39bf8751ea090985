// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! End-to-end scenarios over the whole pipeline.
//!
//! Each test feeds Lua source through `translate_source` and asserts on
//! the emitted Python text, pinning the translation contract: class
//! synthesis, super rewriting, loop splitting, table shapes, hoisting,
//! stdlib renames and import resolution.

use crate::translate_source;

/// Structural sanity for emitted output: indentation is a multiple of
/// four spaces and only ever deepens below a line opening a block.
fn assert_indentation_consistent(source: &str) {
    let mut previous_indent = 0usize;
    let mut previous_opened_block = false;
    for line in source.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = line.len() - line.trim_start().len();
        assert_eq!(indent % 4, 0, "indent not a multiple of 4: {:?}", line);
        if indent > previous_indent {
            assert!(
                previous_opened_block && indent == previous_indent + 4,
                "indentation jumped without a block opener: {:?}",
                line
            );
        }
        previous_indent = indent;
        previous_opened_block = line.trim_end().ends_with(':');
    }
}

#[test]
fn minimal_class_scenario() {
    let out = translate_source(
        "Animal = Object:extend()\n\
         function Animal:init(name) self.name = name end\n\
         function Animal:speak() return self.name end",
    )
    .unwrap();

    // Object is the root sentinel, so no base is listed
    assert!(out.contains("class Animal:"), "got:\n{}", out);
    assert!(!out.contains("class Animal("), "got:\n{}", out);
    assert!(out.contains("def __init__(self, name):"), "got:\n{}", out);
    assert!(out.contains("self.name = name"), "got:\n{}", out);
    assert!(out.contains("def speak(self):"), "got:\n{}", out);
    assert!(out.contains("return self.name"), "got:\n{}", out);
    assert_indentation_consistent(&out);
}

#[test]
fn inheritance_with_super_scenario() {
    let out = translate_source(
        "Animal = Object:extend()\n\
         function Animal:init(name) self.name = name end\n\
         Dog = Animal:extend()\n\
         function Dog:init(n) Dog.super.init(self, n) end",
    )
    .unwrap();

    assert!(out.contains("class Dog(Animal):"), "got:\n{}", out);
    assert!(out.contains("super().__init__(n)"), "got:\n{}", out);
    assert_indentation_consistent(&out);
}

#[test]
fn inheritance_with_plain_base_init_idiom() {
    let out = translate_source(
        "Animal = Object:extend()\n\
         function Animal:init(name) self.name = name end\n\
         Dog = Animal:extend()\n\
         function Dog:init(n) Animal.init(self, n) end",
    )
    .unwrap();

    assert!(out.contains("class Dog(Animal):"), "got:\n{}", out);
    assert!(out.contains("super().__init__(n)"), "got:\n{}", out);
}

#[test]
fn ipairs_split_scenario() {
    let out = translate_source("for kv in ipairs(list) do print(kv) end").unwrap();
    assert!(
        out.contains("for k, v in enumerate(list):"),
        "got:\n{}",
        out
    );
    // the split is a binding transformation only: body references stay
    assert!(out.contains("print(kv)"), "got:\n{}", out);
}

#[test]
fn explicit_two_name_ipairs_target_passes_through() {
    let out = translate_source("for i, v in ipairs(list) do print(i, v) end").unwrap();
    assert!(
        out.contains("for i, v in enumerate(list):"),
        "got:\n{}",
        out
    );
}

#[test]
fn pairs_loop_iterates_items() {
    let out = translate_source("for k, v in pairs(map) do print(k, v) end").unwrap();
    assert!(out.contains("for k, v in map.items():"), "got:\n{}", out);
}

#[test]
fn table_versus_list_scenario() {
    let out = translate_source("t = {1, 2, 3}").unwrap();
    assert_eq!(out, "t = [1, 2, 3]\n");

    let out = translate_source("t = {a = 1, b = 2}").unwrap();
    assert_eq!(out, "t = {'a': 1, 'b': 2}\n");
}

#[test]
fn anonymous_function_hoist_scenario() {
    let out = translate_source(
        "function f(x) return (function(y) return y + 1 end)(x) end",
    )
    .unwrap();

    let def_pos = out.find("def lambda1(y):").expect("hoisted definition");
    let use_pos = out.find("return lambda1(x)").expect("call through the hoisted name");
    assert!(def_pos < use_pos, "got:\n{}", out);
    assert!(out.contains("return y + 1"), "got:\n{}", out);
    assert_indentation_consistent(&out);
}

#[test]
fn hoist_deduplication_emits_one_definition() {
    let out = translate_source(
        "function f()\n\
           local a = function(y) return y + 1 end\n\
           local b = function(y) return y + 1 end\n\
           local c = function(z) return z end\n\
         end",
    )
    .unwrap();
    assert_eq!(out.matches("def lambda1(y):").count(), 1, "got:\n{}", out);
    assert!(out.contains("def lambda2(z):"), "got:\n{}", out);
}

#[test]
fn string_stdlib_rewrite_scenario() {
    let out = translate_source("s = string.upper(name)").unwrap();
    assert_eq!(out, "s = name.upper()\n");

    // string.sub keeps the historical replace mapping
    let out = translate_source("s = string.sub(name, a, b)").unwrap();
    assert_eq!(out, "s = name.replace(a, b)\n");
}

#[test]
fn table_stdlib_rewrites() {
    let out = translate_source(
        "table.insert(items, v)\n\
         table.remove(items)\n\
         table.sort(items)\n\
         s = table.concat(items)",
    )
    .unwrap();
    assert!(out.contains("items.append(v)"), "got:\n{}", out);
    assert!(out.contains("items.pop()"), "got:\n{}", out);
    assert!(out.contains("items.sort()"), "got:\n{}", out);
    assert!(out.contains("s = ''.join(items)"), "got:\n{}", out);
}

#[test]
fn import_resolution_covers_referenced_modules_only() {
    let out = translate_source(
        "x = math.floor(1.5)\n\
         os.exit(0)",
    )
    .unwrap();
    assert!(out.contains("import math\n"), "got:\n{}", out);
    assert!(out.contains("import sys\n"), "got:\n{}", out);
    assert!(out.contains("sys.exit(0)"), "got:\n{}", out);
    assert!(!out.contains("import re"), "got:\n{}", out);
    assert!(!out.contains("import tempfile"), "got:\n{}", out);
}

#[test]
fn operator_precedence_round_trips_grouping() {
    // explicit grouping survives
    let out = translate_source("x = (1 + 2) * 3").unwrap();
    assert_eq!(out, "x = (1 + 2) * 3\n");

    // natural precedence needs no parentheses
    let out = translate_source("x = 1 + 2 * 3").unwrap();
    assert_eq!(out, "x = 1 + 2 * 3\n");

    // right-nested subtraction keeps its parens
    let out = translate_source("x = a - (b - c)").unwrap();
    assert_eq!(out, "x = a - (b - c)\n");

    // Lua ^ is right-associative, like the target's **
    let out = translate_source("x = 2 ^ 3 ^ 4").unwrap();
    assert_eq!(out, "x = 2 ** 3 ** 4\n");
}

#[test]
fn goto_label_lowering() {
    let out = translate_source(
        "::retry::\n\
         count = count + 1\n\
         goto retry",
    )
    .unwrap();
    assert!(out.contains("def retry():"), "got:\n{}", out);
    assert!(out.contains("global count"), "got:\n{}", out);
    assert!(out.contains("retry()"), "got:\n{}", out);
    assert_indentation_consistent(&out);
}

#[test]
fn repeat_until_keeps_test_polarity() {
    let out = translate_source("repeat x = x - 1 until x == 0").unwrap();
    assert!(out.contains("while True:"), "got:\n{}", out);
    assert!(out.contains("if x == 0:"), "got:\n{}", out);
    assert!(out.contains("break"), "got:\n{}", out);
}

#[test]
fn require_import_shapes() {
    let out = translate_source("require('socket')").unwrap();
    assert_eq!(out, "import socket\n");

    let out = translate_source("require('lib/json')").unwrap();
    assert_eq!(out, "from lib import json\n");

    let out = translate_source("require('app.models.user')").unwrap();
    assert_eq!(out, "from app.models import user\n");
}

#[test]
fn larger_program_translates_cleanly() {
    let source = r#"
Stack = Object:extend()

function Stack:init()
    self.items = {}
    self.count = 0
end

function Stack:push(value)
    table.insert(self.items, value)
    self.count = self.count + 1
end

function Stack:pop()
    if self.count == 0 then
        return nil
    end
    self.count = self.count - 1
    return table.remove(self.items)
end

local s = Stack()
for i = 1, 10 do
    s:push(i * 2)
end
while s.count > 0 do
    print(s:pop())
end
"#;
    let out = translate_source(source).unwrap();
    assert!(out.contains("class Stack:"), "got:\n{}", out);
    assert!(out.contains("def __init__(self):"), "got:\n{}", out);
    assert!(out.contains("self.items = []"), "got:\n{}", out);
    assert!(out.contains("def push(self, value):"), "got:\n{}", out);
    assert!(out.contains("self.items.append(value)"), "got:\n{}", out);
    assert!(out.contains("self.count = self.count + 1"), "got:\n{}", out);
    assert!(out.contains("return self.items.pop()"), "got:\n{}", out);
    assert!(out.contains("for i in range(1, 10):"), "got:\n{}", out);
    assert!(out.contains("s.push(i * 2)"), "got:\n{}", out);
    assert!(out.contains("while s.count > 0:"), "got:\n{}", out);
    assert!(out.contains("print(s.pop())"), "got:\n{}", out);
    assert_indentation_consistent(&out);
}

#[test]
fn elseif_chains_emit_elif() {
    let out = translate_source(
        "if a then\n\
           x = 1\n\
         elseif b then\n\
           x = 2\n\
         else\n\
           x = 3\n\
         end",
    )
    .unwrap();
    assert!(out.contains("if a:"), "got:\n{}", out);
    assert!(out.contains("elif b:"), "got:\n{}", out);
    assert!(out.contains("else:"), "got:\n{}", out);
    assert_indentation_consistent(&out);
}

#[test]
fn nil_checks_translate_to_comparisons() {
    let out = translate_source("if x ~= nil then print(x) end").unwrap();
    assert!(out.contains("if x != None:"), "got:\n{}", out);
}

#[test]
fn emitted_output_ends_with_newline() {
    let out = translate_source("x = 1").unwrap();
    assert!(out.ends_with('\n'));
    assert!(!out.ends_with("\n\n"));
}
