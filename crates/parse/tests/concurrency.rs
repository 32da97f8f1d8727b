//! One parse per worker, shared immutable results.

use std::sync::Arc;

use rayon::prelude::*;
use sigscope_parse::{parse_field_signature, parse_method_signature};

const CORPUS: &[&str] = &[
    "Ljava/lang/String;",
    "[[[[Ljava/lang/String;",
    "Ljava/util/Map<-Ljava/lang/String;+Ljava/lang/Number;>;",
    "Lcom/x/Triple<***>;",
    "Lfoo/a/InCGen<TK;TV;>.En.Sub.SubV<TR;>.SubSubValue.SubSubSubValue",
    "Ljava/lang/ThreadLocal<Ljava/lang/ref/SoftReference<Lcom/ctc/wstx/io/BufferRecycler;>;>;",
];

#[test]
fn workers_parse_independently() {
    // Each worker owns its cursor; nothing is shared between parses.
    let results: Vec<String> = CORPUS
        .par_iter()
        .flat_map(|text| (0..16).into_par_iter().map(move |_| *text))
        .map(|text| {
            parse_field_signature(text)
                .expect("parses")
                .internal_name()
                .to_string()
        })
        .collect();
    for chunk in results.chunks(16) {
        for (a, b) in chunk.iter().zip(chunk.iter().skip(1)) {
            assert_eq!(a, b);
        }
    }
}

#[test]
fn parsed_trees_are_shared_read_only() {
    let sig = Arc::new(
        parse_method_signature(
            "<T:Ljava/lang/Object;>(Ljava/util/Collection<TT;>;Ljava/util/Collection<TT;>;)Z",
        )
        .expect("parses"),
    );
    let renders: Vec<String> = (0..32)
        .into_par_iter()
        .map({
            let sig = Arc::clone(&sig);
            move |_| sig.to_string()
        })
        .collect();
    for render in renders {
        assert_eq!(
            "<T:Ljava/lang/Object;>(Ljava/util/Collection<TT;>;Ljava/util/Collection<TT;>;)Z",
            render
        );
    }
}
