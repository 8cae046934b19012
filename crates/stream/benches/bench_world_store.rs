use std::hint::black_box;
use std::sync::Arc;
use std::time::Instant;

use mcworld_common::{Block, Location, Material};
use mcworld_kernel::Chunk;
use mcworld_registry::DimensionRegistry;
use mcworld_stream::{FeedConfig, WorldFeed};

const ORE: Material = Material(56);

fn make_feed(side: i32) -> WorldFeed {
    let mut feed = WorldFeed::new(Arc::new(DimensionRegistry::new()), FeedConfig::default());
    feed.login(None, "overworld")
        .expect("built-in dimensions always load");
    for x in -side..side {
        for z in -side..side {
            let mut floor = Chunk::filled(Block::new(Material(1)));
            floor.set_block(8, 8, 8, Block::new(ORE));
            feed.receive_column(x, z, vec![Some(floor)]);
        }
    }
    feed
}

fn bench_receive_columns(side: i32, iterations: usize) {
    let start = Instant::now();
    for _ in 0..iterations {
        black_box(make_feed(black_box(side)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    let columns = (2 * side) * (2 * side);
    println!(
        "  receive ({columns} columns, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_block_reads(side: i32, iterations: usize) {
    let feed = make_feed(side);
    let world = feed.world();

    let start = Instant::now();
    for i in 0..iterations {
        let x = (i as i32 * 7) % (side * 16);
        let z = (i as i32 * 13) % (side * 16);
        let _ = black_box(world.block(black_box(&Location::block(x, -60, z))));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  block reads ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_find_block(radius: f64, iterations: usize) {
    let feed = make_feed(4);
    let world = feed.world();
    let origin = Location::block(0, -56, 0);

    let start = Instant::now();
    let mut found = 0;
    for _ in 0..iterations {
        found = black_box(world.find_block(black_box(&origin), ORE, radius)).len();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  find_block (r={radius}, {found} matches, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== World Store Benchmarks ===\n");

    println!("Column ingest:");
    bench_receive_columns(2, 100);
    bench_receive_columns(8, 10);

    println!("\nBlock reads:");
    bench_block_reads(4, 100_000);

    println!("\nfind_block:");
    bench_find_block(4.0, 1000);
    bench_find_block(16.0, 50);
    bench_find_block(32.0, 5);

    println!("\n=== Done ===");
}
