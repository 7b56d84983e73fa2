use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicKind {
    Pediatric,
    Nutrition,
    Exercise,
    Sleep,
    Stress,
    Heart,
    Diabetes,
    Headache,
    MentalHealth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PediatricFocus {
    Development,
    Feeding,
    Vaccination,
    Illness,
    Sleep,
    Nutrition,
    Behavior,
}

#[derive(Debug, Clone, Copy)]
pub struct Canned {
    pub en: &'static str,
    pub es: &'static str,
}

#[derive(Debug)]
pub struct Subtopic {
    pub focus: PediatricFocus,
    pub keywords: &'static [&'static str],
    pub response: Canned,
}

#[derive(Debug)]
pub struct Topic {
    pub kind: TopicKind,
    pub keywords: &'static [&'static str],
    pub response: Canned,
    pub subtopics: &'static [Subtopic],
}

// Priority order matters: the first topic with a keyword hit wins.
pub static TOPICS: &[Topic] = &[
    Topic {
        kind: TopicKind::Pediatric,
        keywords: &[
            "baby",
            "babies",
            "infant",
            "toddler",
            "child",
            "=kid",
            "kids",
            "newborn",
            "pediatric",
            "daughter",
            // bare "son" is a common Spanish verb
            "=my son",
            "=my son's",
            "=our son",
            "=her son",
            "=his son",
            "bebé",
            "bebés",
            "niño",
            "nino",
            "niña",
            "nina",
            "hijo",
            "hija",
            "recién nacido",
            "recien nacido",
            "pediatra",
        ],
        response: Canned {
            en: "Children's health needs change quickly as they grow. Regular well-child visits let our pediatric team track growth, development and vaccinations. If your child has a high fever, trouble breathing, is unusually sleepy or refuses to drink, please seek care right away. Tell me more about your child's age and what you are noticing so I can share more specific guidance.",
            es: "Las necesidades de salud de los niños cambian rápidamente a medida que crecen. Las consultas regulares de control permiten a nuestro equipo pediátrico seguir el crecimiento, el desarrollo y las vacunas. Si su hijo tiene fiebre alta, dificultad para respirar, está inusualmente somnoliento o se niega a beber, busque atención de inmediato. Cuénteme la edad de su hijo y lo que está notando para darle orientación más específica.",
        },
        subtopics: &[
            Subtopic {
                focus: PediatricFocus::Development,
                keywords: &[
                    "develop",
                    "milestone",
                    "crawl",
                    "walking",
                    "talking",
                    "speech",
                    "growth",
                    "desarrollo",
                    "gatea",
                    "camina",
                    "habla",
                    "crecimiento",
                ],
                response: Canned {
                    en: "Every child develops at their own pace, but there are general milestones: most babies smile by 2 months, sit without support around 6 months, crawl between 7 and 10 months and take first steps between 9 and 15 months. Words usually appear around the first birthday. If your child is not meeting milestones or loses skills they already had, mention it at the next well-child visit so our pediatric team can evaluate.",
                    es: "Cada niño se desarrolla a su propio ritmo, pero existen etapas generales: la mayoría de los bebés sonríen a los 2 meses, se sientan sin apoyo alrededor de los 6 meses, gatean entre los 7 y 10 meses y dan sus primeros pasos entre los 9 y 15 meses. Las primeras palabras suelen aparecer cerca del primer cumpleaños. Si su hijo no alcanza estas etapas o pierde habilidades que ya tenía, menciónelo en la próxima consulta de control para que nuestro equipo pediátrico lo evalúe.",
                },
            },
            Subtopic {
                focus: PediatricFocus::Feeding,
                keywords: &[
                    "feed",
                    "breast",
                    "bottle",
                    "formula",
                    "latch",
                    "amamant",
                    "lactancia",
                    "pecho",
                    "biberón",
                    "biberon",
                    "fórmula",
                ],
                response: Canned {
                    en: "Breast milk or iron-fortified formula is all a baby needs for about the first 6 months. Newborns usually feed 8 to 12 times a day. Signs of good feeding include steady weight gain and around 6 wet diapers a day. Solid foods can begin around 6 months, one new food at a time. If your baby has trouble latching, seems hungry all the time or is not gaining weight, please contact our clinic.",
                    es: "La leche materna o la fórmula fortificada con hierro es todo lo que un bebé necesita durante aproximadamente los primeros 6 meses. Los recién nacidos suelen comer de 8 a 12 veces al día. Las señales de buena alimentación incluyen un aumento de peso constante y unos 6 pañales mojados al día. Los alimentos sólidos pueden comenzar alrededor de los 6 meses, un alimento nuevo a la vez. Si su bebé tiene dificultad para prenderse al pecho, parece tener hambre todo el tiempo o no aumenta de peso, comuníquese con nuestra clínica.",
                },
            },
            Subtopic {
                focus: PediatricFocus::Vaccination,
                keywords: &[
                    "vaccin",
                    "shot",
                    "immuniz",
                    "vacuna",
                    "inmuniz",
                ],
                response: Canned {
                    en: "Vaccines protect children from serious diseases such as measles, whooping cough and polio. The recommended schedule starts at birth and continues with visits at 2, 4, 6, 12 and 15 months, then again before school. Mild fussiness or a low fever after a shot is normal. Bring your child's vaccination card to every visit and ask us about free vaccines available through our clinic.",
                    es: "Las vacunas protegen a los niños de enfermedades graves como el sarampión, la tos ferina y la polio. El calendario recomendado comienza al nacer y continúa con visitas a los 2, 4, 6, 12 y 15 meses, y nuevamente antes de entrar a la escuela. Es normal que el niño esté algo irritable o tenga fiebre baja después de una vacuna. Traiga la cartilla de vacunación de su hijo a cada consulta y pregúntenos por las vacunas gratuitas disponibles en nuestra clínica.",
                },
            },
            Subtopic {
                focus: PediatricFocus::Illness,
                keywords: &[
                    "fever",
                    "sick",
                    "cough",
                    "cold",
                    "rash",
                    "vomit",
                    "diarrhea",
                    "fiebre",
                    "enferm",
                    "tos",
                    "resfriado",
                    "vómito",
                    "vomito",
                    "diarrea",
                    "sarpullido",
                ],
                response: Canned {
                    en: "Most childhood colds and stomach bugs get better on their own with rest and plenty of fluids. Watch for warning signs: a fever over 100.4°F (38°C) in a baby under 3 months, trouble breathing, dehydration (no tears, dry mouth, few wet diapers), a rash that does not fade when pressed, or unusual drowsiness. Any of these need prompt medical attention. Never give aspirin to children.",
                    es: "La mayoría de los resfriados y malestares estomacales en los niños mejoran por sí solos con descanso y muchos líquidos. Esté atento a las señales de alarma: fiebre mayor de 38°C (100.4°F) en un bebé menor de 3 meses, dificultad para respirar, deshidratación (sin lágrimas, boca seca, pocos pañales mojados), un sarpullido que no desaparece al presionarlo o somnolencia inusual. Cualquiera de estas señales requiere atención médica inmediata. Nunca le dé aspirina a los niños.",
                },
            },
            Subtopic {
                focus: PediatricFocus::Sleep,
                keywords: &[
                    "sleep",
                    "nap",
                    "bedtime",
                    "night",
                    "dormir",
                    "duerme",
                    "sueño",
                    "siesta",
                ],
                response: Canned {
                    en: "Sleep needs change with age: newborns sleep 14 to 17 hours a day, toddlers 11 to 14 hours including naps, and school-age children 9 to 12 hours. A consistent bedtime routine with a bath, a story and a dark, quiet room helps. Always place babies on their back to sleep, on a firm surface without pillows or loose blankets.",
                    es: "Las necesidades de sueño cambian con la edad: los recién nacidos duermen de 14 a 17 horas al día, los niños pequeños de 11 a 14 horas incluyendo siestas y los niños en edad escolar de 9 a 12 horas. Una rutina constante antes de dormir con baño, un cuento y una habitación oscura y tranquila ayuda mucho. Siempre acueste a los bebés boca arriba, sobre una superficie firme sin almohadas ni cobijas sueltas.",
                },
            },
            Subtopic {
                focus: PediatricFocus::Nutrition,
                keywords: &[
                    "nutrition",
                    "diet",
                    "food",
                    "eat",
                    "picky",
                    "vegetable",
                    "nutrición",
                    "nutricion",
                    "dieta",
                    "comida",
                    "comer",
                    "no come",
                    "alimenta",
                    "verdura",
                ],
                response: Canned {
                    en: "Children need a variety of fruits, vegetables, whole grains, protein and dairy. Offer small portions and let your child decide how much to eat. Picky eating is common, and a new food may need to be offered 10 to 15 times before it is accepted. Limit juice and sugary drinks, and offer water and milk instead.",
                    es: "Los niños necesitan una variedad de frutas, verduras, granos integrales, proteínas y lácteos. Ofrezca porciones pequeñas y deje que su hijo decida cuánto comer. Es común que los niños sean selectivos con la comida, y puede ser necesario ofrecer un alimento nuevo de 10 a 15 veces antes de que lo acepten. Limite los jugos y las bebidas azucaradas, y ofrezca agua y leche en su lugar.",
                },
            },
            Subtopic {
                focus: PediatricFocus::Behavior,
                keywords: &[
                    "behavior",
                    "behaviour",
                    "tantrum",
                    "discipline",
                    "hitting",
                    "comportamiento",
                    "conducta",
                    "berrinche",
                    "rabieta",
                    "disciplina",
                ],
                response: Canned {
                    en: "Tantrums and testing limits are a normal part of growing up, especially between ages 1 and 4. Stay calm, keep routines predictable and praise the behavior you want to see. Clear, simple rules with consistent consequences work better than yelling or physical punishment. If behavior problems affect school, friendships or family life, our team can connect you with support.",
                    es: "Los berrinches y poner a prueba los límites son parte normal del crecimiento, especialmente entre 1 y 4 años. Mantenga la calma, conserve rutinas predecibles y elogie el comportamiento que desea ver. Las reglas claras y sencillas con consecuencias constantes funcionan mejor que los gritos o el castigo físico. Si los problemas de conducta afectan la escuela, las amistades o la vida familiar, nuestro equipo puede ayudarle a encontrar apoyo.",
                },
            },
        ],
    },
    Topic {
        kind: TopicKind::Nutrition,
        keywords: &[
            "nutrition",
            "diet",
            "food",
            "eat",
            "healthy eating",
            "vitamin",
            "weight",
            "nutrición",
            "nutricion",
            "dieta",
            "comida",
            "comer",
            "alimentación",
            "alimentacion",
            "vitamina",
            "peso",
        ],
        response: Canned {
            en: "A balanced diet includes plenty of vegetables and fruits, whole grains, lean proteins such as beans, fish and chicken, and healthy fats. Try to fill half your plate with vegetables, drink water instead of sugary drinks and limit processed foods and salt. Our clinic can refer you to a nutrition counselor at no cost if you would like a personalized plan.",
            es: "Una alimentación balanceada incluye muchas verduras y frutas, granos integrales, proteínas magras como frijoles, pescado y pollo, y grasas saludables. Intente llenar la mitad de su plato con verduras, tome agua en lugar de bebidas azucaradas y limite los alimentos procesados y la sal. Nuestra clínica puede referirle sin costo a un consejero de nutrición si desea un plan personalizado.",
        },
        subtopics: &[],
    },
    Topic {
        kind: TopicKind::Exercise,
        keywords: &[
            "exercise",
            "workout",
            "fitness",
            "physical activity",
            "walk",
            "running",
            "gym",
            "ejercicio",
            "actividad física",
            "actividad fisica",
            "caminar",
            "correr",
            "gimnasio",
        ],
        response: Canned {
            en: "Adults should aim for at least 150 minutes of moderate activity each week, such as brisk walking, dancing or cycling, plus muscle-strengthening activities twice a week. You can split it into short sessions of 10 minutes or more. Start slowly if you have been inactive, and talk with a provider before starting if you have heart disease, diabetes or joint problems.",
            es: "Los adultos deben tratar de hacer al menos 150 minutos de actividad moderada cada semana, como caminar a paso rápido, bailar o andar en bicicleta, además de ejercicios de fortalecimiento muscular dos veces por semana. Puede dividirlo en sesiones cortas de 10 minutos o más. Comience poco a poco si ha estado inactivo y consulte con un proveedor antes de empezar si tiene enfermedad del corazón, diabetes o problemas en las articulaciones.",
        },
        subtopics: &[],
    },
    Topic {
        kind: TopicKind::Sleep,
        keywords: &[
            "sleep",
            "insomnia",
            "tired",
            "fatigue",
            "dormir",
            "duermo",
            "sueño",
            "insomnio",
            "cansad",
            "fatiga",
        ],
        response: Canned {
            en: "Most adults need 7 to 9 hours of sleep each night. Keep a regular schedule, even on weekends, avoid caffeine after noon and screens an hour before bed, and keep your bedroom dark, quiet and cool. If you snore loudly, wake up gasping or feel exhausted despite enough sleep, please schedule a visit so we can check for a sleep disorder.",
            es: "La mayoría de los adultos necesitan de 7 a 9 horas de sueño cada noche. Mantenga un horario regular, incluso los fines de semana, evite la cafeína después del mediodía y las pantallas una hora antes de acostarse, y mantenga su habitación oscura, silenciosa y fresca. Si ronca fuerte, se despierta sin aliento o se siente agotado a pesar de dormir lo suficiente, programe una consulta para evaluar si tiene un trastorno del sueño.",
        },
        subtopics: &[],
    },
    Topic {
        kind: TopicKind::Stress,
        keywords: &[
            "stress",
            "anxious",
            "anxiety",
            "worried",
            "overwhelm",
            "nervous",
            "estrés",
            "estres",
            "ansiedad",
            "preocupad",
            "agobiad",
            "nervios",
        ],
        response: Canned {
            en: "Stress is a normal reaction to life's challenges, but too much for too long can affect your health. Slow breathing, regular physical activity, enough sleep and talking with people you trust can help. Try to set aside a few minutes each day for something you enjoy. If stress or worry is making it hard to work, sleep or care for your family, our counselors are here to help.",
            es: "El estrés es una reacción normal a los desafíos de la vida, pero demasiado estrés durante mucho tiempo puede afectar su salud. Respirar lentamente, hacer actividad física con regularidad, dormir lo suficiente y hablar con personas de confianza puede ayudar. Trate de apartar unos minutos cada día para algo que disfrute. Si el estrés o la preocupación le dificultan trabajar, dormir o cuidar de su familia, nuestros consejeros están aquí para ayudarle.",
        },
        subtopics: &[],
    },
    Topic {
        kind: TopicKind::Heart,
        keywords: &[
            "heart",
            "blood pressure",
            "hypertension",
            "cholesterol",
            "chest pain",
            "corazón",
            "corazon",
            "presión arterial",
            "presion arterial",
            "hipertensión",
            "hipertension",
            "colesterol",
            "dolor de pecho",
        ],
        response: Canned {
            en: "You can protect your heart by not smoking, staying active, eating less salt and saturated fat, and keeping blood pressure, cholesterol and blood sugar under control. Normal blood pressure is below 120/80. Our clinic offers free blood pressure checks. If you have chest pain, pain spreading to the arm or jaw, shortness of breath or sudden sweating, call 911 immediately.",
            es: "Puede proteger su corazón si no fuma, se mantiene activo, consume menos sal y grasas saturadas y mantiene bajo control la presión arterial, el colesterol y el azúcar en la sangre. La presión arterial normal es menor de 120/80. Nuestra clínica ofrece mediciones de presión arterial gratuitas. Si tiene dolor en el pecho, dolor que se extiende al brazo o la mandíbula, falta de aire o sudor repentino, llame al 911 de inmediato.",
        },
        subtopics: &[],
    },
    Topic {
        kind: TopicKind::Diabetes,
        keywords: &[
            "diabet",
            "blood sugar",
            "glucose",
            "insulin",
            "a1c",
            "azúcar en la sangre",
            "azucar en la sangre",
            "glucosa",
            "insulina",
        ],
        response: Canned {
            en: "Diabetes can be managed well with healthy eating, regular activity, medication when needed and regular check-ups. Common warning signs include excessive thirst, frequent urination, blurred vision and slow-healing cuts. If you already have diabetes, check your blood sugar as directed, look at your feet every day and keep your A1c appointments. Our clinic provides free diabetes education classes.",
            es: "La diabetes se puede controlar bien con una alimentación saludable, actividad regular, medicamentos cuando sea necesario y chequeos regulares. Las señales de alerta comunes incluyen sed excesiva, orinar con frecuencia, visión borrosa y heridas que tardan en sanar. Si ya tiene diabetes, mida su azúcar en la sangre según las indicaciones, revise sus pies todos los días y no falte a sus citas de A1c. Nuestra clínica ofrece clases gratuitas de educación sobre la diabetes.",
        },
        subtopics: &[],
    },
    Topic {
        kind: TopicKind::Headache,
        keywords: &[
            "headache",
            "migraine",
            "head hurts",
            "head pain",
            "dolor de cabeza",
            "migraña",
            "migrana",
            "jaqueca",
        ],
        response: Canned {
            en: "Most headaches are caused by tension, dehydration, lack of sleep or skipped meals. Drinking water, resting in a quiet dark room and over-the-counter pain relievers used as directed usually help. Keep a diary of when headaches happen to find triggers. Seek care right away for a sudden, severe headache, a headache with fever and stiff neck, confusion, weakness or vision changes, or after a head injury.",
            es: "La mayoría de los dolores de cabeza se deben a tensión, deshidratación, falta de sueño o saltarse comidas. Tomar agua, descansar en una habitación oscura y tranquila y usar analgésicos de venta libre según las indicaciones suele ayudar. Lleve un diario de cuándo ocurren los dolores de cabeza para identificar las causas. Busque atención de inmediato si tiene un dolor de cabeza repentino y muy fuerte, dolor de cabeza con fiebre y cuello rígido, confusión, debilidad o cambios en la visión, o después de un golpe en la cabeza.",
        },
        subtopics: &[],
    },
    Topic {
        kind: TopicKind::MentalHealth,
        keywords: &[
            "depress",
            "mental health",
            "sad",
            "lonely",
            "mood",
            "panic",
            "hopeless",
            "depresión",
            "depresion",
            "salud mental",
            "triste",
            "soledad",
            "ánimo",
            "animo",
            "pánico",
            "panico",
        ],
        response: Canned {
            en: "Your mental health is as important as your physical health. Feeling sad, hopeless or uninterested in things you used to enjoy for more than two weeks may be a sign of depression, which is common and treatable. Our clinic offers confidential counseling in English and Spanish. If you are thinking about hurting yourself, call or text 988 right now to reach the Suicide and Crisis Lifeline.",
            es: "Su salud mental es tan importante como su salud física. Sentirse triste, sin esperanza o sin interés en las cosas que antes disfrutaba por más de dos semanas puede ser una señal de depresión, que es común y tiene tratamiento. Nuestra clínica ofrece consejería confidencial en inglés y español. Si está pensando en hacerse daño, llame o envíe un mensaje de texto al 988 ahora mismo para comunicarse con la Línea de Prevención del Suicidio y Crisis.",
        },
        subtopics: &[],
    },
];

pub static GENERIC: Canned = Canned {
    en: "I'm the clinic's health assistant and I'm currently answering from my offline library. You can ask me about children's health, nutrition, exercise, sleep, stress, heart health, diabetes, headaches or mental health. For anything urgent, please call the clinic or 911.",
    es: "Soy el asistente de salud de la clínica y en este momento respondo desde mi biblioteca sin conexión. Puede preguntarme sobre la salud de los niños, nutrición, ejercicio, sueño, estrés, salud del corazón, diabetes, dolores de cabeza o salud mental. Para cualquier urgencia, llame a la clínica o al 911.",
};
