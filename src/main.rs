use rand::Rng;
use skipindex::OrderedIndex;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = rand::thread_rng();
    let mut index = OrderedIndex::new();
    index.put(50, 50);
    for _ in 0..20 {
        let k = rng.gen_range(0..100);
        index.put(k, k * 10);
    }
    println!("{:?}", index);
    println!("get(50) = {:?}", index.get(50));
    println!("ceiling(42) = {:?}", index.ceiling(42));
    println!("floor(42) = {:?}", index.floor(42));
    println!("range(20, 60) = {:?}", index.range(20, 60));
    index.delete(50);
    println!("get(50) = {:?}", index.get(50));
    println!("{:?}", index);
}
