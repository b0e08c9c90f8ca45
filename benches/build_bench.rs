use criterion::{criterion_group, criterion_main, Criterion};
use ip2as::sources::{RegistryPrefix, RoutedPrefix};
use ip2as::{resolve_origin, As2Org, AsGraph, BuildConfig, ExchangePoints, Inputs, OriginToken};
use ipnet::{IpNet, Ipv4Net};
use std::hint::black_box;
use std::net::Ipv4Addr;

fn prefix(i: u32, len: u8) -> IpNet {
    let addr = Ipv4Addr::from((i << 8).wrapping_add(0x0100_0000));
    IpNet::V4(Ipv4Net::new(addr, len).unwrap().trunc())
}

fn synthetic_inputs(n: u32) -> Inputs {
    let graph = AsGraph::from_cones((1..=64).map(|asn| (asn, (asn..=64).collect::<Vec<_>>())));
    let orgs = As2Org::from_pairs((1..=64).map(|asn| (asn, format!("ORG-{}", asn % 16))));
    Inputs {
        exchange_points: ExchangePoints::from_pairs((0..n / 100).map(|i| (prefix(i * 100, 24), i))),
        routed: (0..n)
            .map(|i| RoutedPrefix {
                prefix: prefix(i, 24),
                origin: OriginToken::from_candidates(vec![i % 64 + 1, (i * 7) % 64 + 1]).unwrap(),
            })
            .collect(),
        registry: (0..n / 4)
            .map(|i| RegistryPrefix {
                prefix: prefix(i * 4, 22),
                candidates: OriginToken::from_candidates(vec![i % 64 + 1]).unwrap(),
            })
            .collect(),
        graph,
        orgs,
    }
}

fn benchmark_build_table(c: &mut Criterion) {
    let inputs = synthetic_inputs(50_000);
    let config = BuildConfig::default();

    c.bench_function("build_table_50k", |b| {
        b.iter(|| {
            let (table, _) = black_box(&inputs).build(&config);
            black_box(table.len())
        })
    });
}

fn benchmark_resolve_origin(c: &mut Criterion) {
    let inputs = synthetic_inputs(0);
    let token: OriginToken = "{3,9}_17_40_{51,52,60}".parse().unwrap();

    c.bench_function("resolve_origin_moas", |b| {
        b.iter(|| resolve_origin(black_box(&token), &inputs.orgs, &inputs.graph))
    });
}

criterion_group!(benches, benchmark_build_table, benchmark_resolve_origin);
criterion_main!(benches);
