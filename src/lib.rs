pub mod core;
pub mod schema;
pub mod codec;
pub mod acl;
pub mod vocabulary;
pub mod filter;
pub mod query;
pub mod index;
pub mod search;

/*
┌──────────────────────────────────────────────────────────────────────────────────────┐
│                                RESDEX ARCHITECTURE                                    │
└──────────────────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────────────── COMPILE ────────────────────────────────────────┐
│                                                                                       │
│   Query (algebra tree, serde)                                                         │
│      │                                                                                │
│      ▼                                                                                │
│  ┌─────────────────────────────────────────────────────────────────────────────┐     │
│  │                          struct QueryCompiler                                │     │
│  │ config: Config                              // limits, liveness policy       │     │
│  │ vocabularies: Arc<VocabularyRegistry>       // named hierarchical vocabs     │     │
│  │ liveness: Arc<dyn LivenessFilterProvider>   // deleted-docs view             │     │
│  │ validator: QueryValidator                   // depth / clause checks         │     │
│  └─────────────────────────────────────────────────────────────────────────────┘     │
│      │ one BuildContext per compile (liveness fetched lazily, once)                   │
│      ▼                                                                                │
│  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌────────────┐  │
│  │ term / range │ │ wildcard     │ │ hierarchical │ │ acl          │ │ uri        │  │
│  │ ValueCodec   │ │ prefix       │ │ IN = closure │ │ privilege    │ │ ancestorIds│  │
│  │ FieldNames   │ │ *_lc fields  │ │              │ │ closure      │ │ + self id  │  │
│  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘ └────────────┘  │
│      │ negation: invert(positive) = Bool{ must: Live, must_not: positive }            │
│      ▼                                                                                │
│   CompiledQuery { Term | ConstantScore(Filter) | Boolean(Must/Should) }               │
└───────────────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────────── EXECUTE ───────────────────────────────────────┐
│                                                                                       │
│  IndexBuilder ──build──► InvertedIndex { field -> fst::Map + Vec<RoaringBitmap> }     │
│                                │                                                      │
│                                ▼                                                      │
│  IndexSnapshots { RwLock<Arc<Snapshot>> }   Snapshot { version, generation, index,   │
│                                                        deleted_docs }                 │
│      (LivenessFilterProvider)               deletes swap in a new snapshot            │
│                                │                                                      │
│                                ▼                                                      │
│  Searcher { snapshot, FilterCache(lru) } ──► SearchResults { hits, total_hits }       │
└───────────────────────────────────────────────────────────────────────────────────────┘
*/
