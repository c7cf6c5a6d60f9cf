// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

extern crate regexp;

use regexp::{Error, Regexp};

const GOOD: &'static [&'static str] = &[
    r"",
    r".",
    r"^.$",
    r"a",
    r"a*",
    r"a+",
    r"a?",
    r"a|b",
    r"a*|b*",
    r"(a*|b)(c*|d)",
    r"[a-z]",
    r"[a-abc-c\-\]\[]",
    r"[a-z]+",
    r"[]",
    r"[abc]",
    r"[^1234]",
    r"[^\n]",
];

#[test]
fn good_compile() {
    for &expr in GOOD {
        if let Err(err) = Regexp::new(expr) {
            panic!("compiling `{}`: unexpected error: {}", expr, err);
        }
    }
}

#[test]
fn bad_compile() {
    let bad = &[
        (r"*", Error::BareClosure),
        (r"(abc", Error::UnmatchedLpar),
        (r"abc)", Error::UnmatchedRpar),
        (r"x[a-z", Error::UnmatchedLbkt),
        (r"abc]", Error::UnmatchedRbkt),
        (r"[z-a]", Error::BadRange),
        ("abc\\", Error::ExtraneousBackslash),
        (r"a**", Error::BadClosure),
        (r"a*+", Error::BadClosure),
        (r"a??", Error::BadClosure),
        (r"\x", Error::BadBackslash),
    ];
    for &(expr, err) in bad {
        match Regexp::new(expr) {
            Ok(_) => panic!("`{}` compiled, want {}", expr, err),
            Err(got) => {
                assert_eq!(got, err, "`{}`: got {}, want {}", expr, got, err)
            }
        }
    }
}

/// The offset table: expression, text, expected submatch vector. An empty
/// vector means the expression must not match at all.
fn match_table() -> Vec<(&'static str, &'static str, Vec<isize>)> {
    vec![
        (r"^abcdefg", "abcdefg", vec![0, 7]),
        (r"a+", "baaab", vec![1, 4]),
        ("abcd..", "abcdef", vec![0, 6]),
        (r"", "", vec![0, 0]),
        (r"a", "a", vec![0, 1]),
        (r"x", "y", vec![]),
        (r"b", "abc", vec![1, 2]),
        (r".", "a", vec![0, 1]),
        (r".*", "abcdef", vec![0, 6]),
        (r"^", "abcde", vec![0, 0]),
        (r"$", "abcde", vec![5, 5]),
        (r"^abcd$", "abcd", vec![0, 4]),
        (r"^bcd'", "abcdef", vec![]),
        (r"^abcd$", "abcde", vec![]),
        (r"a*", "baaab", vec![0, 0]),
        (r"[a-z]+", "abcd", vec![0, 4]),
        (r"[^a-z]+", "ab1234cd", vec![2, 6]),
        (r"[a\-\]z]+", "az]-bcz", vec![0, 4]),
        (r"[^\n]+", "abcd\n", vec![0, 4]),
        (r"[日本語]+", "日本語日本語", vec![0, 18]),
        (r"日本語+", "日本語", vec![0, 9]),
        (r"日本語+", "日本語語語語", vec![0, 18]),
        (r"()", "", vec![0, 0, 0, 0]),
        (r"(a)", "a", vec![0, 1, 0, 1]),
        (r"(.)(.)", "日a", vec![0, 4, 0, 3, 3, 4]),
        (r"(.*)", "", vec![0, 0, 0, 0]),
        (r"(.*)", "abcd", vec![0, 4, 0, 4]),
        (r"(..)(..)", "abcd", vec![0, 4, 0, 2, 2, 4]),
        (r"(([^xyz]*)(d))", "abcd", vec![0, 4, 0, 4, 0, 3, 3, 4]),
        (r"((a|b|c)*(d))", "abcd", vec![0, 4, 0, 4, 2, 3, 3, 4]),
        (r"(((a|b|c)*)(d))", "abcd", vec![0, 4, 0, 4, 0, 3, 2, 3, 3, 4]),
        (r"a*(|(b))c*", "aacc", vec![0, 4, 2, 2, -1, -1]),
        (r"(.*).*", "ab", vec![0, 2, 0, 2]),
        (r"[.]", ".", vec![0, 1]),
        (r"/$", "/abc/", vec![4, 5]),
        (r"/$", "/abc", vec![]),
        (r"ab$", "cab", vec![1, 3]),
        (r"axxb$", "axxcb", vec![]),
    ]
}

#[test]
fn execute_offsets() {
    for (expr, text, want) in match_table() {
        let re = Regexp::new(expr).unwrap();
        let got = re.execute(text);
        assert_eq!(
            got, want,
            "execute failure on `{}` matching {:?}",
            expr, text
        );
        let got = re.execute_bytes(text.as_bytes());
        assert_eq!(
            got, want,
            "execute_bytes failure on `{}` matching {:?}",
            expr, text
        );
    }
}

#[test]
fn is_match_agrees_with_execute() {
    for (expr, text, want) in match_table() {
        let re = Regexp::new(expr).unwrap();
        assert_eq!(
            re.is_match(text),
            !want.is_empty(),
            "is_match failure on `{}` matching {:?}",
            expr,
            text
        );
        assert_eq!(
            re.is_match_bytes(text.as_bytes()),
            !want.is_empty(),
            "is_match_bytes failure on `{}` matching {:?}",
            expr,
            text
        );
    }
}

#[test]
fn match_strings_agrees_with_execute() {
    for (expr, text, want) in match_table() {
        let re = Regexp::new(expr).unwrap();
        let strings = re.match_strings(text);
        let slices = re.match_slices(text.as_bytes());
        assert_eq!(strings.len(), want.len() / 2);
        assert_eq!(slices.len(), want.len() / 2);
        for i in 0..want.len() / 2 {
            let expect = if want[2 * i] >= 0 {
                &text[want[2 * i] as usize..want[2 * i + 1] as usize]
            } else {
                ""
            };
            assert_eq!(
                strings[i], expect,
                "group {} of `{}` on {:?}",
                i, expr, text
            );
            assert_eq!(slices[i], expect.as_bytes());
        }
    }
}

#[test]
fn free_functions() {
    assert_eq!(regexp::is_match(r"a+", "baaab"), Ok(true));
    assert_eq!(regexp::is_match(r"x", "y"), Ok(false));
    assert_eq!(regexp::is_match(r"a**", "y"), Err(Error::BadClosure));
    assert_eq!(regexp::is_match_bytes(r"a+", b"baaab"), Ok(true));
}

#[test]
fn num_subexp() {
    let cases = &[
        (r"", 0),
        (r".*", 0),
        (r"abba", 0),
        (r"ab(b)a", 1),
        (r"ab(.*)a", 1),
        (r"(.*)ab(.*)a", 2),
        (r"(.*)(ab)(.*)a", 3),
        (r"(.*)((a)b)(.*)a", 4),
        (r"(.*)(\(ab)(.*)a", 3),
        (r"(.*)(\(a\)b)(.*)a", 3),
    ];
    for &(expr, want) in cases {
        let re = Regexp::new(expr).unwrap();
        assert_eq!(re.num_subexp(), want, "num_subexp of `{}`", expr);
    }
}

#[test]
fn must_compile_accepts_literals() {
    let re = Regexp::must_compile(r"a+b+");
    assert_eq!(re.execute("xaabbx"), vec![1, 5]);
    assert_eq!(re.as_str(), r"a+b+");
}

#[test]
#[should_panic]
fn must_compile_panics_on_error() {
    Regexp::must_compile(r"a**");
}

// Compiling the same expression twice must produce programs that cannot
// be told apart by matching.
#[test]
fn compile_is_repeatable() {
    let exprs = &[r"a*(|(b))c*", r"(.*).*", r"[a-z]+", r"日本語+"];
    let texts = &["aacc", "ab", "abcd", "日本語語", "", "xyz"];
    for &expr in exprs {
        let first = Regexp::new(expr).unwrap();
        let second = Regexp::new(expr).unwrap();
        for &text in texts {
            assert_eq!(
                first.execute(text),
                second.execute(text),
                "`{}` on {:?}",
                expr,
                text
            );
        }
    }
}
