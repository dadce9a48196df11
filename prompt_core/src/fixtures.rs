//! Test fixtures: a minimal knowledge graph covering every region the pipeline reads.

use knowledge_graph::KnowledgeBroker;
use serde_json::{json, Value};

pub const KINNARI: &str =
    "2.0_Semiotics_and_Psychology_Database.2.7_Theriocephalic_Iconography.Kinnari";
pub const SOLARPUNK: &str =
    "11.0_Narrative_Structure_and_Storytelling.11.4_Speculative_Fiction_and_Futurism.Solarpunk";
pub const IRIS_VAN_HERPEN: &str = "5.0_Masters_Lexicon.5.6_Fashion_and_Costume_Design.Iris van Herpen";

pub fn sample_graph() -> Value {
    json!({
        "KB_ID": "TEST_KB",
        "KB_Version": "0.0-test",
        "1.0_Ontology_and_Philosophy": {
            "Design_Principles": ["Form follows meaning", "Contrast reveals intent"]
        },
        "2.0_Semiotics_and_Psychology_Database": {
            "2.7_Theriocephalic_Iconography": {
                "Description": "Beings combining human and animal forms.",
                "Kinnari": {
                    "Properties": ["Half-bird", "Celestial musician"],
                    "Variants": {
                        "Pal_Subversive": {
                            "Keywords": ["Empowered female hybrid", "Fragmented body", "Mythic defiance"]
                        },
                        "Classical": {
                            "Keywords": []
                        }
                    }
                },
                "Kamdhenu": {
                    "Properties": ["Wish-fulfilling cow", "Maternal abundance"]
                }
            },
            "2.8_Archetypal_Dynamics_Framework (Jungian)": {
                "Parameters": {
                    "Shadow_Integration_State": {
                        "Values": ["Assimilating", "Projected", "Integrated"]
                    }
                },
                "Translation_Matrix": {
                    "Assimilating": {
                        "Aesthetic_Signifiers": [
                            "5.0_Masters_Lexicon.5.3_Art_and_Design_References.Cinematographers.Roger_Deakins",
                            "Mood.Positive_Reconciliation"
                        ]
                    }
                }
            }
        },
        "5.0_Masters_Lexicon": {
            "5.3_Art_and_Design_References": {
                "Cinematographers": ["Roger_Deakins", "Bradford_Young"]
            },
            "5.6_Fashion_and_Costume_Design": {
                "Iris van Herpen": [
                    "Complex organic couture",
                    "3D printed patterns",
                    "Futuristic silhouettes"
                ]
            }
        },
        "10.0_Technical_Execution_Ontology": {
            "10.1_Digital_Cinema_Cameras": {
                "ARRI": ["ARRI Alexa 35", "ARRI Alexa Mini LF"],
                "Canon": ["Canon EOS R5", "Canon C300 Mark III"]
            },
            "10.2_Lenses_and_Optics": {
                "Zeiss": ["Zeiss Supreme Prime Radiance", "Zeiss Master Prime"],
                "Cooke": ["Cooke S4/i"]
            },
            "10.8_Physical_Process_Artifact_Taxonomy": {
                "Daguerreotype": {
                    "Artifacts": ["Mirror-like silver plate", "Tarnished edges", "Sharp"],
                    "Era": "1840s"
                }
            }
        },
        "11.0_Narrative_Structure_and_Storytelling": {
            "11.4_Speculative_Fiction_and_Futurism": {
                "Solarpunk": [
                    "Regenerative urban design",
                    "Photosynthetic materials",
                    "Collective governance"
                ]
            }
        },
        "region": {
            "Kinnari": {
                "Properties": ["Half-bird", "Celestial musician"],
                "Variants": {
                    "Subversive": {
                        "Keywords": ["Subverted myth", "Defiant gaze"]
                    }
                }
            }
        }
    })
}

pub fn sample_broker() -> KnowledgeBroker {
    KnowledgeBroker::new(sample_graph())
}
