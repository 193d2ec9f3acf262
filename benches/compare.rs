//! benchmarks against the standard ordered string set
//!
//! Run with: cargo bench

use std::collections::BTreeSet;

use criterion::{
	black_box,
	criterion_group,
	criterion_main,
	BatchSize,
	Criterion,
};
use radix_set::set::Set;

// deterministic word list with heavy prefix sharing
fn word_list() -> Vec<Vec<u8>> {
	const HEADS: [&str; 8] = ["com", "con", "cor", "mah", "mat", "pre", "pro", "sub"];
	const MIDS: [&str; 8] = ["pu", "ta", "ner", "jo", "ri", "mi", "ce", "li"];
	const TAILS: [&str; 8] = ["te", "in", "nate", "ng", "x", "ssion", "dent", "me"];
	let mut words = Vec::with_capacity(HEADS.len() * MIDS.len() * TAILS.len());
	for head in HEADS {
		for mid in MIDS {
			for tail in TAILS {
				words.push(format!("{head}{mid}{tail}").into_bytes());
			}
		}
	}
	words
}

fn bench_insert(c: &mut Criterion) {
	let words = word_list();
	c.bench_function("insert/radix", |b| {
		b.iter(|| {
			let mut set = Set::new();
			for word in &words {
				set.insert(black_box(word));
			}
			set
		})
	});
	c.bench_function("insert/btree", |b| {
		b.iter(|| {
			let mut set = BTreeSet::new();
			for word in &words {
				set.insert(black_box(word.clone()));
			}
			set
		})
	});
}

fn bench_prefix_len(c: &mut Criterion) {
	let words = word_list();
	let set: Set = words.iter().collect();
	let btree: BTreeSet<Vec<u8>> = words.iter().cloned().collect();
	c.bench_function("prefix_len/radix", |b| {
		b.iter(|| {
			let mut total = 0;
			for first in b'a'..=b'z' {
				total += set.prefix_len(black_box([first]));
			}
			total
		})
	});
	c.bench_function("prefix_len/btree", |b| {
		b.iter(|| {
			let mut total = 0;
			for first in b'a'..=b'z' {
				total += btree
					.range(vec![first]..vec![first + 1])
					.count();
			}
			total
		})
	});
}

fn bench_find_prefix(c: &mut Criterion) {
	let words = word_list();
	let set: Set = words.iter().collect();
	let btree: BTreeSet<Vec<u8>> = words.iter().cloned().collect();
	c.bench_function("find_prefix/radix", |b| {
		b.iter(|| set.find_prefix(black_box("conta")).map(|cursor| cursor.key()))
	});
	c.bench_function("find_prefix/btree", |b| {
		b.iter(|| {
			btree
				.range(b"conta".to_vec()..)
				.next()
				.filter(|key| key.starts_with(black_box(b"conta")))
				.cloned()
		})
	});
}

fn bench_remove_prefix(c: &mut Criterion) {
	let words = word_list();
	let set: Set = words.iter().collect();
	let btree: BTreeSet<Vec<u8>> = words.iter().cloned().collect();
	c.bench_function("remove_prefix/radix", |b| {
		b.iter_batched(
			|| set.clone(),
			|mut set| {
				set.remove_prefix(black_box("pre"));
				set
			},
			BatchSize::SmallInput,
		)
	});
	c.bench_function("remove_prefix/btree", |b| {
		b.iter_batched(
			|| btree.clone(),
			|mut btree| {
				btree.retain(|key| !key.starts_with(black_box(b"pre")));
				btree
			},
			BatchSize::SmallInput,
		)
	});
}

fn bench_iterate(c: &mut Criterion) {
	let words = word_list();
	let set: Set = words.iter().collect();
	let btree: BTreeSet<Vec<u8>> = words.iter().cloned().collect();
	// the two containers must agree before anything gets timed
	assert!(set.iter().eq(btree.iter().cloned()));
	c.bench_function("iterate/radix", |b| b.iter(|| set.iter().count()));
	c.bench_function("iterate/btree", |b| b.iter(|| btree.iter().count()));
}

criterion_group!(
	benches,
	bench_insert,
	bench_prefix_len,
	bench_find_prefix,
	bench_remove_prefix,
	bench_iterate,
);
criterion_main!(benches);
