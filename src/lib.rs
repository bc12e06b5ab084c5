pub mod core;
pub mod storage;
pub mod index;
pub mod enrich;
pub mod search;
pub mod query;
pub mod mvcc;

/*
┌────────────────────────────────────────────────────────────────────────────────────────────┐
│                           MATCHPOINT STRUCT ARCHITECTURE                                    │
└────────────────────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────────────── CORE LAYER ──────────────────────────────────────────┐
│                                                                                              │
│  ┌────────────────────────────────────────────────────────────────────────────────────┐    │
│  │                               struct Database<R>                                    │    │
│  │  ┌──────────────────────────────────────────────────────────────────────────────┐ │    │
│  │  │ config: Config                      // Data dir, format, limits              │ │    │
│  │  │ loader: PartitionLoader<R>          // Dimension + partition reads           │ │    │
│  │  │ snapshots: SnapshotController       // Atomic snapshot publication           │ │    │
│  │  └──────────────────────────────────────────────────────────────────────────────┘ │    │
│  └────────────────────────────────────────────────────────────────────────────────────┘    │
│                                                                                              │
│  ┌──────────────────┐  ┌──────────────────┐  ┌───────────────────────────────────────┐    │
│  │ struct Config    │  │ struct FactRow   │  │ struct EnrichedMatch                  │    │
│  │ • data_dir       │  │ • p1/p2/winner   │  │ • FactRow fields + partition          │    │
│  │ • table_format   │  │ • tournament_id  │  │ • p1/p2/winner_name: Option<String>   │    │
│  │ • default_limit  │  │ • date, round    │  │ • tournament_name, surface, series    │    │
│  │ • recent_limit   │  │ • score          │  │ • winner_side: WinnerSide             │    │
│  │ • final_round    │  └──────────────────┘  └───────────────────────────────────────┘    │
│  │ • load_workers   │                                                                       │
│  └──────────────────┘  ┌──────────────────┐  ┌───────────────────────────────────────┐    │
│                        │ enum Surface     │  │ struct HealthReport                   │    │
│                        │ • Hard, Clay     │  │ • status: HealthStatus                │    │
│                        │ • Grass, Carpet  │  │ • data: TableCounts                   │    │
│                        │ • Other(String)  │  │ • partitions_loaded / skipped         │    │
│                        └──────────────────┘  └───────────────────────────────────────┘    │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── STORAGE LAYER ──────────────────────────────────────────┐
│                                                                                              │
│  ┌────────────────────────┐  ┌──────────────────────┐  ┌───────────────────────┐          │
│  │ struct PartitionLoader │  │ trait TableReader    │  │ struct StorageLayout  │          │
│  │ • layout               │  │ • read_rows<T>()     │  │ • base_dir            │          │
│  │ • reader: R            │  │ FsTableReader:       │  │ • fact_dir            │          │
│  │ • workers (rayon)      │  │ • Json / JsonLines   │  │ • format              │          │
│  │ • cancel: CancelFlag   │  │ • Bincode            │  └───────────────────────┘          │
│  └────────────────────────┘  └──────────────────────┘                                      │
│                                                                                              │
│  fact_matches/year=<Y>/month=<M>/data.<ext> ──discover──> PartitionFile ──read──> FactRow   │
│                                         └──unusable──> SkippedPartition (LoadReport)        │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────────────── MVCC LAYER ────────────────────────────────────────────┐
│                                                                                              │
│  ┌────────────────────────────────────────────────────────────────────────────────────┐    │
│  │                           struct SnapshotController                                 │    │
│  │  ┌──────────────────────────────────────────────────────────────────────────────┐ │    │
│  │  │ current: RwLock<Arc<Snapshot>>                // Published snapshot          │ │    │
│  │  │ next_version: AtomicU64                       // Version counter             │ │    │
│  │  │ reload_lock: Mutex<()>                        // One reload at a time        │ │    │
│  │  └──────────────────────────────────────────────────────────────────────────────┘ │    │
│  └────────────────────────────────────────────────────────────────────────────────────┘    │
│                                                                                              │
│  ┌────────────────────────┐  ┌─────────────────────────┐  ┌────────────────────────┐      │
│  │ struct Snapshot        │  │ struct DimensionStore   │  │ struct EnrichmentReport│      │
│  │ • version: u64         │  │ • players / tournaments │  │ • missing_p1/p2        │      │
│  │ • loaded_at: DateTime  │  │ • player_index: HashMap │  │ • missing_winner       │      │
│  │ • dims                 │  │ • tournament_index      │  │ • missing_tournament   │      │
│  │ • matches: Vec<Enr..>  │  └─────────────────────────┘  │ • unattributed_winners │      │
│  │ • load_report          │                               └────────────────────────┘      │
│  │ • enrichment           │                                                                 │
│  └────────────────────────┘                                                                 │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── QUERY LAYER ────────────────────────────────────────────┐
│                                                                                              │
│  QueryEngine<'a> (borrows one Snapshot)                                                      │
│  • list_players        ──> PlayerList                                                        │
│  • player_stats        ──> PlayerStats { career: CareerRecord, by_surface }                  │
│  • head_to_head        ──> HeadToHead { head_to_head, recent_matches }                       │
│  • list_tournaments    ──> TournamentList                                                    │
│  • tournament_details  ──> TournamentDetails { recent_champions }                            │
│                                                                                              │
│  NameResolver: case-insensitive substring, first candidate in table order wins              │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────── RELATIONSHIPS ────────────────────────────────────────────┐
│                                                                                              │
│  Database ──owns──> PartitionLoader ──reads──> LoadedTables                                 │
│     │                                              │                                        │
│     ├──owns──> SnapshotController ──publishes──> Snapshot <──builds── Snapshot::build       │
│     │                                              │              (DimensionStore + enrich) │
│     └──per call──> QueryEngine ──borrows──> Snapshot                                        │
│                         └──uses──> NameResolver                                             │
│                                                                                              │
└──────────────────────────────────────────────────────────────────────────────────────────────┘
*/
