use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use scroogecoin_lib::{
    Amount, KeyPair, Sha256, Transaction, TransactionHash, TransactionOutput, TxHandler, Utxo,
    UtxoPool,
};

const CHAIN_LENGTH: usize = 100;

// A chain of transactions, each spending the single output of the previous one.
fn create_chain(key_pair: &KeyPair) -> (UtxoPool, Vec<Transaction>) {
    let genesis_hash = TransactionHash::new(Sha256::digest(b"genesis"));
    let pool = vec![(
        Utxo::new(genesis_hash, 0),
        TransactionOutput::new(key_pair.public_key(), Amount::from(1_000)),
    )]
    .into_iter()
    .collect();

    let mut transactions = vec![];
    let mut previous_hash = genesis_hash;
    for _ in 0..CHAIN_LENGTH {
        let mut transaction = Transaction::new(vec![], vec![]);
        transaction.add_input(previous_hash, 0);
        transaction.add_output(key_pair.public_key(), Amount::from(1_000));
        key_pair.sign_input(&mut transaction, 0).unwrap();
        previous_hash = transaction.finalize();
        transactions.push(transaction);
    }
    (pool, transactions)
}

fn settle_benchmark(c: &mut Criterion) {
    let key_pair = KeyPair::from_seed(b"benchmark").unwrap();
    let (pool, transactions) = create_chain(&key_pair);

    let mut group = c.benchmark_group("Settlement");
    group.throughput(Throughput::Elements(CHAIN_LENGTH as u64));
    group.bench_function("handle_txs for a chain of 100 transactions", |b| {
        b.iter_batched(
            || (TxHandler::new(&pool), transactions.clone()),
            |(mut handler, batch)| black_box(handler.handle_txs(batch)),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("is_valid_tx", |b| {
        let handler = TxHandler::new(&pool);
        b.iter(|| black_box(handler.is_valid_tx(black_box(&transactions[0]))))
    });
    group.finish();
}

criterion_group!(benches, settle_benchmark);

criterion_main!(benches);
